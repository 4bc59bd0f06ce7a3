//! Rendered markup. Every helper operation returns a `Markup`; callers that
//! stream straight into a response use [`Markup::emit_to`].

use std::fmt;
use std::io;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Write the fragment to `out` immediately, in call order.
    pub fn emit_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.0.as_bytes())
    }
}

impl From<String> for Markup {
    fn from(s: String) -> Self {
        Markup(s)
    }
}

impl std::ops::Deref for Markup {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Markup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::ops::Add<Markup> for Markup {
    type Output = Markup;

    fn add(mut self, rhs: Markup) -> Markup {
        self.0.push_str(&rhs.0);
        self
    }
}
