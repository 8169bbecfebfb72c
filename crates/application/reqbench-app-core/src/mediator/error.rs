#[derive(Debug, thiserror::Error)]
pub enum MediatorError {
    #[error("{domain} mediator was used before its container finished registration")]
    NotRegistered { domain: &'static str },
}
