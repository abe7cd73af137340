use std::collections::HashMap;

/// Resolves `$VARIABLE` references in config paths
pub struct Tpl {
    variables: HashMap<String, String>,
}

impl Tpl {
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
        }
    }

    pub fn register<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.variables.insert(key.into(), value.into());
    }

    /// Replace every registered `$KEY` in `input`.
    ///
    /// Longer keys are substituted first so that `$SOURCE_DIR` is not
    /// clobbered by a shorter `$SOURCE`.
    pub fn parse(&self, input: &str) -> String {
        let mut keys: Vec<&String> = self.variables.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut result = input.to_string();
        for key in keys {
            let pattern = format!("${}", key);
            result = result.replace(&pattern, &self.variables[key]);
        }

        result
    }
}

impl Default for Tpl {
    fn default() -> Self {
        Self::new()
    }
}
