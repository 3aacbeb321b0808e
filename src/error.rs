use thiserror::Error;

/// Boxed error produced by an engine adapter, carried as the source of the
/// crate's own variants.
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Model or vocabulary loading failed. This can only surface while a
    /// client is being constructed; a client handed to the caller always
    /// holds a fully initialized engine.
    #[error("engine initialization failed")]
    Init(#[source] EngineError),
    /// The engine rejected a detect call.
    #[error("detection failed")]
    Detect(#[source] EngineError),
    /// The engine rejected a benchmark call.
    #[error("benchmark failed")]
    Benchmark(#[source] EngineError),
}
