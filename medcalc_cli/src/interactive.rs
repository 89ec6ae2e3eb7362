//! Line-oriented calculator session on any reader/writer pair.

use std::io::{self, BufRead, Write};

use medcalc_core::calculator::FieldDefinition;
use medcalc_core::engine::CalculatorSession;
use medcalc_core::format::number;
use medcalc_core::FormulaResult;

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Walk every field of the open calculator, then print the result.
/// Repeats while the user answers `y`.
pub fn run<R: BufRead, W: Write>(
    session: &mut CalculatorSession,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let calculator = session.calculator();
    writeln!(output, "{} ({})", calculator.name, calculator.short_name)?;
    writeln!(output, "{}", calculator.description)?;
    writeln!(output, "Press Enter to keep the value in brackets.")?;

    loop {
        writeln!(output)?;
        for field in calculator.fields {
            let current = session.values().get(field.id);
            let keep_going = if field.is_choice() {
                prompt_choice(session, field, current, input, output)?
            } else {
                prompt_number(session, field, current, input, output)?
            };
            if !keep_going {
                return Ok(());
            }
        }

        let result = session.calculate().clone();
        writeln!(output)?;
        write_result(output, &result)?;
        writeln!(output)?;

        match prompt_line(input, output, "Calculate again? [y/N]: ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => continue,
            _ => return Ok(()),
        }
    }
}

fn prompt_number<R: BufRead, W: Write>(
    session: &mut CalculatorSession,
    field: &FieldDefinition,
    current: Option<f64>,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let unit = if field.unit.is_empty() {
        String::new()
    } else {
        format!(" ({})", field.unit)
    };
    let shown = current.map(number).unwrap_or_default();
    let prompt = format!("{}{} [{}]: ", field.label, unit, shown);

    let Some(entry) = prompt_line(input, output, &prompt)? else {
        return Ok(false);
    };
    if !entry.is_empty() {
        session
            .set_field(field.id, &entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    }
    Ok(true)
}

fn prompt_choice<R: BufRead, W: Write>(
    session: &mut CalculatorSession,
    field: &FieldDefinition,
    current: Option<f64>,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let choices = field.choices();
    writeln!(output, "{}:", field.label)?;
    let mut selected = None;
    for (i, choice) in choices.iter().enumerate() {
        // Values may repeat, so the first match is the one shown as current
        let marker = if selected.is_none() && current == Some(choice.value) {
            selected = Some(i + 1);
            '*'
        } else {
            ' '
        };
        writeln!(output, " {} {}) {}", marker, i + 1, choice.label)?;
    }
    let prompt = format!(
        "Choice [{}]: ",
        selected.map(|i| i.to_string()).unwrap_or_default()
    );

    loop {
        let Some(entry) = prompt_line(input, output, &prompt)? else {
            return Ok(false);
        };
        if entry.is_empty() {
            return Ok(true);
        }
        match entry.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => {
                session
                    .select_choice(field.id, n - 1)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
                return Ok(true);
            }
            _ => writeln!(output, "Enter a number from 1 to {}.", choices.len())?,
        }
    }
}

/// Human-readable result block.
pub fn write_result<W: Write>(output: &mut W, result: &FormulaResult) -> io::Result<()> {
    writeln!(output, "Result: {} {}", result.value, result.unit)?;
    if let Some(interpretation) = &result.interpretation {
        writeln!(output, "Interpretation: {}", interpretation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcalc_core::registry::REGISTRY;
    use std::io::Cursor;

    fn drive(id: &str, script: &str) -> (CalculatorSession, String) {
        let mut session = CalculatorSession::open(REGISTRY.get(id).unwrap());
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        run(&mut session, &mut input, &mut output).unwrap();
        (session, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_numeric_session() {
        let (session, out) = drive("bmi", "70\n175\nn\n");
        assert_eq!(session.last_result().unwrap().value, "22.9");
        assert!(out.contains("Weight (kg) []: "));
        assert!(out.contains("Result: 22.9 kg/m²"));
        assert!(out.contains("Interpretation: Normal"));
    }

    #[test]
    fn test_blank_entry_keeps_default() {
        // A-a gradient pre-fills FiO2 with 21
        let (session, out) = drive("aa-grad", "\n40\n90\nn\n");
        assert_eq!(session.values().get("fio2"), Some(21.0));
        assert!(out.contains("[21]: "));
        assert!(session.last_result().is_some());
    }

    #[test]
    fn test_choice_selection_and_retry() {
        let gcs = REGISTRY.get("gcs").unwrap();
        let eye = gcs.field("eye").unwrap();
        let last = eye.choices().len();
        let script = format!("9\n{}\n\n\nn\n", last);
        let (session, out) = drive("gcs", &script);
        assert!(out.contains("Enter a number from 1 to"));
        assert_eq!(session.values().get("eye"), Some(eye.choices()[last - 1].value));
    }

    #[test]
    fn test_end_of_input_stops_quietly() {
        let (session, _) = drive("bmi", "70\n");
        assert!(session.last_result().is_none());
    }

    #[test]
    fn test_repeat_calculation() {
        let (session, out) = drive("map", "120\n80\ny\n80\n40\nn\n");
        assert_eq!(out.matches("Result:").count(), 2);
        assert_eq!(session.last_result().unwrap().value, "53");
    }
}
