// One error type for the whole program.
// Every variant states *where* things went wrong.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating a window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing a buffer to a window failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Config error: {0}")]
    Config(String), // Reading or validating the TOML config failed
    #[error("no header images could be loaded from {0}")]
    NoHeaders(String), // The selector band has nothing to show
    #[error("Detector error: {0}")]
    Detector(String), // Talking to the landmark detector process failed
}
