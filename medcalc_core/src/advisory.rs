//! # Clinical Advisory
//!
//! Contract for the "which calculator should I use?" assistant: the catalog
//! context handed to a language model, the prompt around it, and the
//! [`Advisor`] that turns every failure into a fixed user-facing message.
//!
//! The transport lives behind [`AdvisoryService`]; this crate ships no HTTP
//! client.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculator::CalculatorDefinition;
use crate::errors::CalcResult;
use crate::registry::REGISTRY;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shown when the service answers with no text.
pub const NO_RESPONSE_MESSAGE: &str = "No response generated.";

/// Shown for any transport or service failure.
pub const SERVICE_ERROR_MESSAGE: &str = "Error connecting to clinical assistant. Please try again.";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Generation parameters sent with every advisory request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorySettings {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Must accompany `max_output_tokens` for thinking models
    pub thinking_budget: u32,
}

impl Default for AdvisorySettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_output_tokens: 500,
            thinking_budget: 100,
        }
    }
}

/// One fully built request.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryRequest {
    pub prompt: String,
    pub settings: AdvisorySettings,
}

/// Something that can answer a prompt.
///
/// `Ok(None)` means the service answered without any text.
pub trait AdvisoryService: Send + Sync {
    fn complete<'a>(
        &'a self,
        request: &'a AdvisoryRequest,
    ) -> BoxFuture<'a, CalcResult<Option<String>>>;
}

/// One line per calculator, `- {name} ({short name}): {description}`,
/// in catalog order.
pub fn catalog_context(calculators: &[CalculatorDefinition]) -> String {
    calculators
        .iter()
        .map(|c| format!("- {} ({}): {}", c.name, c.short_name, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap the catalog context and the user's question in the assistant
/// instructions.
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "You are a clinical assistant for a hospital app.\n\
         The user is asking about a medical calculation or a clinical case.\n\
         Based on the available tools listed below, \
         suggest the most appropriate calculation and explain why.\n\
         \n\
         Tools Available:\n\
         {context}\n\
         \n\
         User Query: \"{query}\"\n\
         \n\
         Provide a concise, professional answer. \
         Suggest exactly which tool from the list above should be used."
    )
}

/// Front door for advisory questions.
pub struct Advisor<S> {
    service: S,
    settings: AdvisorySettings,
    context: String,
}

impl<S: AdvisoryService> Advisor<S> {
    /// Advisor over the built-in catalog.
    pub fn new(service: S, settings: AdvisorySettings) -> Self {
        Self::with_catalog(service, settings, REGISTRY.all())
    }

    pub fn with_catalog(
        service: S,
        settings: AdvisorySettings,
        calculators: &[CalculatorDefinition],
    ) -> Self {
        Self {
            service,
            settings,
            context: catalog_context(calculators),
        }
    }

    /// Request for `query` as it would be sent to the service.
    pub fn request(&self, query: &str) -> AdvisoryRequest {
        AdvisoryRequest {
            prompt: build_prompt(&self.context, query),
            settings: self.settings.clone(),
        }
    }

    /// Ask the assistant.
    ///
    /// Returns `None` for a blank query (nothing is sent). Otherwise always
    /// returns display text: the answer, [`NO_RESPONSE_MESSAGE`], or
    /// [`SERVICE_ERROR_MESSAGE`].
    pub async fn ask(&self, query: &str) -> Option<String> {
        if query.trim().is_empty() {
            return None;
        }

        let request = self.request(query);
        debug!(model = %request.settings.model, "sending advisory request");

        let text = match self.service.complete(&request).await {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => NO_RESPONSE_MESSAGE.to_string(),
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "advisory request failed");
                SERVICE_ERROR_MESSAGE.to_string()
            }
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;
    use std::sync::Mutex;

    struct Canned {
        reply: CalcResult<Option<String>>,
        seen: Mutex<Vec<AdvisoryRequest>>,
    }

    impl Canned {
        fn new(reply: CalcResult<Option<String>>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl AdvisoryService for Canned {
        fn complete<'a>(
            &'a self,
            request: &'a AdvisoryRequest,
        ) -> BoxFuture<'a, CalcResult<Option<String>>> {
            self.seen.lock().unwrap().push(request.clone());
            let reply = self.reply.clone();
            Box::pin(async move { reply })
        }
    }

    #[test]
    fn test_catalog_context_lines() {
        let context = catalog_context(REGISTRY.all());
        let lines: Vec<_> = context.lines().collect();
        assert_eq!(lines.len(), 45);
        assert_eq!(
            lines[10],
            "- Body Mass Index (BMI) (BMI): Measures body fat based on height and weight."
        );
    }

    #[test]
    fn test_prompt_contains_context_and_quoted_query() {
        let prompt = build_prompt("- A (a): first", "kidney dosing");
        assert!(prompt.starts_with("You are a clinical assistant"));
        assert!(prompt.contains("Tools Available:\n- A (a): first\n"));
        assert!(prompt.contains("User Query: \"kidney dosing\""));
        assert!(prompt.ends_with("should be used."));
    }

    #[test]
    fn test_default_settings() {
        let settings = AdvisorySettings::default();
        assert_eq!(settings.model, "gemini-3-flash-preview");
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.max_output_tokens, 500);
        assert_eq!(settings.thinking_budget, 100);
    }

    #[tokio::test]
    async fn test_blank_query_is_not_sent() {
        let advisor = Advisor::new(Canned::new(Ok(Some("x".into()))), AdvisorySettings::default());
        assert_eq!(advisor.ask("   ").await, None);
        assert!(advisor.service.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_answer_is_passed_through() {
        let advisor = Advisor::new(
            Canned::new(Ok(Some("Use CrCl.".into()))),
            AdvisorySettings::default(),
        );
        assert_eq!(advisor.ask("renal dosing").await.as_deref(), Some("Use CrCl."));

        let seen = advisor.service.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].prompt.contains("- Creatinine Clearance (Cockcroft-Gault) (CrCl)"));
    }

    #[tokio::test]
    async fn test_empty_reply_message() {
        for reply in [Ok(None), Ok(Some(String::new()))] {
            let advisor = Advisor::new(Canned::new(reply), AdvisorySettings::default());
            assert_eq!(advisor.ask("sepsis").await.as_deref(), Some(NO_RESPONSE_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_service_error_message() {
        let advisor = Advisor::new(
            Canned::new(Err(CalcError::advisory("connection refused"))),
            AdvisorySettings::default(),
        );
        assert_eq!(advisor.ask("sepsis").await.as_deref(), Some(SERVICE_ERROR_MESSAGE));
    }
}
