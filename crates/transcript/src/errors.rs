/// Output that could not be turned into an answer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    #[error("no route listing or \"No path\" message in pathfinder output")]
    Unrecognized,

    #[error("route listing started but never ended")]
    Unterminated,

    #[error("route listing contained no cities")]
    EmptyPath,

    #[error("route listing has no \"Total cost\" line")]
    MissingTotalCost,
}
