//! Stdin Operator
//!
//! Reads operator input from standard input, asynchronously so the
//! surrounding Ctrl-C select keeps working while a prompt is pending.

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use audit_core::error::{AuditError, Result};
use audit_core::workflow::Operator;

/// Operator backed by the terminal
pub struct StdinOperator {
    lines: Lines<BufReader<Stdin>>,
}

impl Default for StdinOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl StdinOperator {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        let line = self.lines.next_line().await?.ok_or(AuditError::NoCredential)?;
        Ok(line)
    }
}

#[async_trait]
impl Operator for StdinOperator {
    async fn read_secret(&mut self, prompt: &str) -> Result<String> {
        self.read_line(prompt).await
    }

    async fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.read_line(prompt).await?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}
