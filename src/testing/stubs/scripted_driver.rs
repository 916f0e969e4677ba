use crate::ui::cli::drivers::PromptDriver;
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::str::FromStr;

/// Answers prompts from a fixed script, in order. Every answer is given as
/// text and parsed to the type the prompt asks for.
pub struct ScriptedDriver {
    answers: RefCell<VecDeque<String>>,
}

impl ScriptedDriver {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.answers.borrow().is_empty()
    }

    fn next(&self, title: &str) -> Result<String> {
        self.answers
            .borrow_mut()
            .pop_front()
            .with_context(|| format!("no scripted answer for '{title}'"))
    }

    fn parsed<T: FromStr>(&self, title: &str) -> Result<T>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self.next(title)?;
        raw.trim()
            .parse()
            .with_context(|| format!("scripted answer '{raw}' for '{title}'"))
    }
}

impl PromptDriver for ScriptedDriver {
    fn choose(&self, title: &str, _help: Option<&str>, options: &[String]) -> Result<usize> {
        let idx: usize = self.parsed(title)?;
        anyhow::ensure!(idx < options.len(), "choice {idx} out of {}", options.len());
        Ok(idx)
    }

    fn ask_bool(&self, title: &str, _help: &str, _default: bool) -> Result<bool> {
        self.parsed(title)
    }

    fn ask_string(&self, title: &str, _help: &str, _default: &str) -> Result<String> {
        self.next(title)
    }

    fn ask_u64(
        &self,
        title: &str,
        _help: &str,
        _default: u64,
        _min: Option<u64>,
        _max: Option<u64>,
    ) -> Result<u64> {
        self.parsed(title)
    }

    fn ask_f64(
        &self,
        title: &str,
        _help: &str,
        _default: f64,
        _min: Option<f64>,
        _max: Option<f64>,
    ) -> Result<f64> {
        self.parsed(title)
    }
}
