//! Scoped environment variables for configuration tests.

use anyhow::{Result, anyhow};

/// Runs `f` inside a [`figment::Jail`] with `vars` set, returning the
/// closure's output.
///
/// The jail restores the environment once the closure completes, whether it
/// succeeded or not. Errors of any displayable type are reported through
/// `anyhow`.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up or `f` fails.
pub fn with_vars<F, T, E>(vars: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: std::fmt::Display,
{
    let mut output = None;
    let mut failure = None;
    figment::Jail::try_with(|jail| {
        jail.clear_env();
        for (key, value) in vars {
            jail.set_env(key, value);
        }
        match f() {
            Ok(value) => output = Some(value),
            Err(err) => failure = Some(err.to_string()),
        }
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    if let Some(message) = failure {
        return Err(anyhow!(message));
    }
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

#[cfg(test)]
mod tests {
    use super::with_vars;

    #[test]
    fn variables_are_visible_inside_the_closure() -> anyhow::Result<()> {
        let seen = with_vars(&[("HELPERS_PROBE", "on")], || {
            std::env::var("HELPERS_PROBE")
        })?;
        anyhow::ensure!(seen == "on", "unexpected value {seen}");
        Ok(())
    }

    #[test]
    fn closure_errors_are_reported() {
        let result = with_vars::<_, (), _>(&[], || Err("boom"));
        assert!(result.is_err_and(|err| err.to_string() == "boom"));
    }
}
