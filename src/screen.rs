pub mod panel;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("Failed to load {region}: {reason}")]
    Fetch { region: String, reason: String },
}
