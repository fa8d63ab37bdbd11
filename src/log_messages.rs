//! Log message constants
//!
//! Centralizes operator-facing log lines so wording stays consistent across
//! the pipeline. None of these lines may ever interpolate secret material.

/// Application lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting Compass Gateway";
    pub const SETTINGS_LOADED: &str = "Configuration resolved";
    /// The one stable line shown to end users on any pipeline failure.
    pub const USER_FACING_FAILURE: &str =
        "The assistant is temporarily unavailable. Please try again.";
}

/// Pipeline step messages
pub mod pipeline {
    pub const AUTHENTICATING: &str = "Authenticating against the user pool";
    pub const AUTHENTICATED: &str = "Identity token obtained";
    pub const EXCHANGING_IDENTITY: &str = "Exchanging token for a federated identity";
    pub const IDENTITY_OBTAINED: &str = "Federated identity obtained";
    pub const VENDING_CREDENTIALS: &str = "Requesting temporary credentials";
    pub const CREDENTIALS_OBTAINED: &str = "Temporary credentials obtained";
    pub const INVOKING_MODEL: &str = "Invoking model";
    pub const REPLY_EXTRACTED: &str = "Model reply extracted";
    pub const STEP_FAILED: &str = "Pipeline step failed";
}
