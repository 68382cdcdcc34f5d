use crate::entity::EntityClass;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to the container engine: {0}")]
    Connect(#[source] bollard::errors::Error),
    #[error("failed to list {class} from the engine: {source}")]
    List {
        class: EntityClass,
        #[source]
        source: bollard::errors::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
