use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded = crate::env::expand_env(&raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the generator command is empty or speech
    /// parameters are out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_generator()?;
        self.validate_speech()?;
        Ok(())
    }

    fn validate_generator(&self) -> anyhow::Result<()> {
        if self.generator.command.trim().is_empty() {
            anyhow::bail!("generator.command must not be empty");
        }

        Ok(())
    }

    fn validate_speech(&self) -> anyhow::Result<()> {
        let Some(ref speech) = self.speech else {
            return Ok(());
        };

        if speech.api_key.expose_secret().is_empty() {
            anyhow::bail!("speech.api_key must not be empty");
        }

        if speech.secret_key.expose_secret().is_empty() {
            anyhow::bail!("speech.secret_key must not be empty");
        }

        if speech.chunk_chars == 0 {
            anyhow::bail!("speech.chunk_chars must be greater than 0");
        }

        if speech.max_text_chars == 0 {
            anyhow::bail!("speech.max_text_chars must be greater than 0");
        }

        if speech.max_polls == 0 {
            anyhow::bail!("speech.max_polls must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use storyloom_core::Language;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_config_uses_defaults() {
        let file = write_config("");
        let config = Config::load(file.path()).unwrap();

        assert!(config.speech.is_none());
        assert_eq!(config.generator.poll_interval_seconds, 5);
        assert_eq!(config.generator.max_wait_seconds, 2700);
        assert_eq!(config.generator.language, Language::Zh);
        assert!(config.server.health.enabled);
    }

    #[test]
    fn speech_section_with_env_keys() {
        let vars = [("SL_TEST_API_KEY", Some("ak")), ("SL_TEST_SECRET_KEY", Some("sk"))];
        temp_env::with_vars(vars, || {
            let file = write_config(
                "[speech]\n\
                 api_key = \"{{ env.SL_TEST_API_KEY }}\"\n\
                 secret_key = \"{{ env.SL_TEST_SECRET_KEY }}\"\n",
            );
            let config = Config::load(file.path()).unwrap();

            let speech = config.speech.unwrap();
            assert_eq!(speech.chunk_chars, 500);
            assert_eq!(speech.max_text_chars, 10_000);
            assert_eq!(speech.max_polls, 30);
            assert_eq!(speech.voice.short_form_voice, 4);
        });
    }

    #[test]
    fn empty_generator_command_rejected() {
        let file = write_config("[generator]\ncommand = \"\"\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn empty_speech_keys_rejected() {
        let file = write_config("[speech]\napi_key = \"\"\nsecret_key = \"sk\"\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let file = write_config("[generator]\nretries = 3\n");
        assert!(Config::load(file.path()).is_err());
    }
}
