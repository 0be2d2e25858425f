/// Execution providers to try before the CPU default.
///
/// ONNX Runtime silently falls back to CPU when a listed provider cannot
/// be registered, so an empty list simply means "CPU only".
pub fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        log::debug!("Requesting CoreML execution provider");
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        log::debug!("Requesting DirectML execution provider");
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        log::debug!("Using CPU execution provider");
        vec![]
    }
}
