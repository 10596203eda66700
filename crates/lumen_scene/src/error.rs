use lumen_lights::LightError;

#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("scene JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("node {node} has invalid parent {parent}")]
    InvalidParent { node: usize, parent: usize },

    #[error("node {node} has a zero or non-finite rotation")]
    InvalidRotation { node: usize },

    #[error("light {light} references missing node {node}")]
    InvalidLightNode { light: usize, node: usize },

    #[error("light {light} has an unknown kind")]
    UnknownLightKind { light: usize },

    #[error("light {light} has a zero or non-finite default orientation")]
    InvalidOrientation { light: usize },

    #[error("no LightBackend resource, add the LightPlugin first")]
    MissingLightBackend,

    #[error(transparent)]
    Light(#[from] LightError),
}

pub type SceneResult<T> = Result<T, SceneError>;
