use crate::compression::Compression;
use crate::rebuild::Summary;
use crate::result::Result;

/// Receives progress notices from a rebuild as they happen
pub trait Reporter {
    /// A member was written to the package
    fn added(&mut self, member: &str, compression: Compression) -> Result<()>;

    /// A manifest entry has no source file and was skipped
    fn missing(&mut self, member: &str) -> Result<()>;

    /// A source file is not named by the manifest and was left out
    fn unlisted(&mut self, path: &str) -> Result<()>;

    /// The package was closed after every entry was processed
    fn finished(&mut self, summary: &Summary) -> Result<()>;
}

/// Terminal output through cliclack
pub struct Console {
    verbose: bool,
}

impl Console {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for Console {
    fn added(&mut self, member: &str, compression: Compression) -> Result<()> {
        if self.verbose {
            cliclack::log::info(format!("Added: {} ({})", member, compression))?;
        } else {
            cliclack::log::info(format!("Added: {}", member))?;
        }
        Ok(())
    }

    fn missing(&mut self, member: &str) -> Result<()> {
        cliclack::log::warning(format!("Warning: {} not found", member))?;
        Ok(())
    }

    fn unlisted(&mut self, path: &str) -> Result<()> {
        if self.verbose {
            cliclack::log::remark(format!("Not in manifest, left out: {}", path))?;
        }
        Ok(())
    }

    fn finished(&mut self, summary: &Summary) -> Result<()> {
        cliclack::outro(format!(
            "Done! {} rebuilt with {} members ({} missing)",
            summary.output.display(),
            summary.added.len(),
            summary.missing.len()
        ))?;
        Ok(())
    }
}

/// Notice captured by [`Recorder`]
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Added(String, Compression),
    Missing(String),
    Unlisted(String),
    Finished,
}

/// Collects notices in memory for inspection
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

#[cfg(test)]
impl Recorder {
    pub fn missing(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Missing(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn finished_count(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Finished).count()
    }
}

#[cfg(test)]
impl Reporter for Recorder {
    fn added(&mut self, member: &str, compression: Compression) -> Result<()> {
        self.events.push(Event::Added(member.to_string(), compression));
        Ok(())
    }

    fn missing(&mut self, member: &str) -> Result<()> {
        self.events.push(Event::Missing(member.to_string()));
        Ok(())
    }

    fn unlisted(&mut self, path: &str) -> Result<()> {
        self.events.push(Event::Unlisted(path.to_string()));
        Ok(())
    }

    fn finished(&mut self, _summary: &Summary) -> Result<()> {
        self.events.push(Event::Finished);
        Ok(())
    }
}
