//! Compile entry points that hide configuration and console wiring.

use tracing::debug;

use moai_compiler::{CompileReport, Model, ModelData, TargetModel};
use moai_config::CompilerConfig;
use moai_core::Result;

/// Configuration file read from the working directory.
pub const CONFIG_FILE: &str = "moai.toml";

/// Compiles `model` into `target` with the configuration in
/// [`CONFIG_FILE`], or the defaults when it is absent or unreadable.
pub fn compile<T: TargetModel>(model: &Model, target: &mut T) -> Result<CompileReport> {
    let config = CompilerConfig::load(CONFIG_FILE).unwrap_or_default();
    compile_with(model, target, &config)
}

/// Compiles `model` into `target` with an explicit configuration.
pub fn compile_with<T: TargetModel>(
    model: &Model,
    target: &mut T,
    config: &CompilerConfig,
) -> Result<CompileReport> {
    #[cfg(feature = "console")]
    moai_console::init_with(&config.logging);

    model.compile(target, config)
}

/// Reads a JSON model document and compiles it into `target`.
///
/// Parsing and registry checks run before anything reaches the target.
pub fn compile_document<T: TargetModel>(json: &str, target: &mut T) -> Result<CompileReport> {
    let data = ModelData::from_json(json)?;
    debug!(model = %data.name, "model document parsed");
    let model = Model::from_data(data)?;
    compile(&model, target)
}
