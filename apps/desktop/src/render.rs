//! Plain-text projection of the controller's view state.

use client_core::ViewState;
use shared::domain::PredictionResult;

pub const LOADING_LABEL: &str = "Predicting...";

pub fn prediction_line(result: &PredictionResult) -> String {
    format!(
        "Prediction: {} (Confidence: {:.2}%)",
        result.label, result.confidence
    )
}

/// Final output of a one-shot run.
pub fn summary(view: &ViewState) -> String {
    if let Some(message) = &view.error_message {
        return message.clone();
    }
    match &view.result {
        Some(result) => {
            let theme = view.theme_key.descriptor();
            format!(
                "{}\nTheme: {} (accent {}, text {})",
                prediction_line(result),
                view.theme_key,
                theme.accent,
                theme.text
            )
        }
        None if view.is_loading => LOADING_LABEL.to_string(),
        None => String::new(),
    }
}

/// Prints one line per visible change; keystroke-only updates are skipped.
#[derive(Default)]
pub struct StatusRenderer {
    last: Option<ViewState>,
}

impl StatusRenderer {
    pub fn render(&mut self, view: &ViewState) -> Option<String> {
        let unchanged = self.last.as_ref().is_some_and(|last| {
            last.is_loading == view.is_loading
                && last.result == view.result
                && last.error_message == view.error_message
        });
        self.last = Some(view.clone());
        if unchanged {
            return None;
        }

        if view.is_loading {
            return Some(LOADING_LABEL.to_string());
        }
        if let Some(message) = &view.error_message {
            return Some(format!("error: {message}"));
        }
        view.result
            .as_ref()
            .map(|result| format!("[{}] {}", view.theme_key, prediction_line(result)))
    }
}
