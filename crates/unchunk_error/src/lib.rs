use std::ops::{Deref, DerefMut};

/// Failures the caller must see. Shape mismatches inside a chunk are
/// warnings, not errors; `BuildError` collects the remaining hard failures
/// (parse rejections, artifact writes) instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  pub fn into_vec(self) -> Vec<anyhow::Error> {
    self.0
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl IntoIterator for BuildError {
  type Item = anyhow::Error;
  type IntoIter = std::vec::IntoIter<anyhow::Error>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;
