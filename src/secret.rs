use config::{ConfigError, Map, Source, Value, ValueKind};

/// Config source that reads `CAMERA_BRIDGE__<KEY>__FILE=<path>` variables and uses the content
/// of the file as the value of `<key>`.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSecretFile {}

const SUFFIX: &str = "__file";
const PREFIX: &str = concat!(std::env!("CARGO_PKG_NAME"), "__");

impl EnvironmentSecretFile {
    fn collect_from(
        &self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Map<String, Value>, ConfigError> {
        vars.into_iter()
            .filter_map(|(key, path)| {
                let key = key.to_lowercase();
                let key = key.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?.replace("__", ".");

                if key.is_empty() {
                    return None;
                }

                Some((key, path))
            })
            .map(|(key, path)| {
                let content = std::fs::read_to_string(&path).map_err(|err| {
                    ConfigError::Message(format!("Failed to read secret '{key}' from '{path}': {err}"))
                })?;
                let content = content.trim_end_matches(['\r', '\n']).to_owned();

                Ok((key, Value::new(Some(&path), ValueKind::String(content))))
            })
            .collect()
    }
}

impl Source for EnvironmentSecretFile {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        self.collect_from(std::env::vars())
    }
}
