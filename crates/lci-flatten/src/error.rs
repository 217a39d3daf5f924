use lci_core::LciError;
use lci_graph::GraphError;
use thiserror::Error;

pub type FlattenResult<T> = Result<T, FlattenError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlattenError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] LciError),

    #[error("Filter list is empty: the first entry must name the nested process to replace")]
    EmptyFilterList,
}
