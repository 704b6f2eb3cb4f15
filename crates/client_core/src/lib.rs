pub mod classifier;
pub mod controller;
pub mod error;

pub use classifier::{Classifier, HttpClassifier, DEFAULT_REQUEST_TIMEOUT};
pub use controller::{
    ControllerEvent, OverlapPolicy, PredictionController, RequestState, SubmitOutcome, ViewState,
};
pub use error::{ClassifyError, UnknownOverlapPolicy};

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod classifier_tests;
