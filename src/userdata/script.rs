//! Shell-script assembly
//!
//! Holds the script as an ordered list of line blocks until the final
//! join, so the trimming and trailing-newline guarantees live in one
//! place instead of being threaded through string concatenation.

/// Builder for a shell script made of blank-line-separated blocks
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    blocks: Vec<Vec<String>>,
}

impl ScriptBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block of lines, rendered with a blank line before it
    ///
    /// Empty blocks are dropped.
    pub fn block<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if !lines.is_empty() {
            self.blocks.push(lines);
        }
        self
    }

    /// Join the blocks into the final script
    ///
    /// Blocks are separated by one blank line; the result is trimmed and
    /// terminated with exactly one `\n`.
    pub fn finish(&self) -> String {
        let joined = self
            .blocks
            .iter()
            .map(|lines| lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut script = joined.trim().to_string();
        script.push('\n');
        script
    }
}
