//! Fancy diagnostics support using `ariadne`.
//!
//! Chart errors carrying byte offsets (see [`ExtractError`]) are rendered as annotated
//! excerpts of the chart text. Errors without a position point at the whole text.
//!
//! # Usage Example
//!
//! ```rust
//! # #[cfg(feature = "diagnostics")]
//! # {
//! use fnf2osu::{diagnostics::emit_chart_error, fnf::parse_chart};
//!
//! let source = "{\"song\": {\"notes\": [";
//! if let Err(err) = parse_chart(source) {
//!     emit_chart_error("bopeebo-hard.json", source, &err);
//! }
//! # }
//! ```

#[cfg(feature = "diagnostics")]
use ariadne::{Color, Label, Report, ReportKind, Source};

#[cfg(feature = "diagnostics")]
use crate::{error::MalformedChart, fnf::extract::ExtractError};

/// Simple source container that holds the filename and source text.
/// Ariadne will automatically handle row/column calculations from byte offsets.
///
/// ```rust
/// use fnf2osu::diagnostics::SimpleSource;
///
/// let source = SimpleSource::new("chart.json", "{}");
/// assert_eq!(source.name(), "chart.json");
/// assert_eq!(source.text(), "{}");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Report type produced by this module.
#[cfg(feature = "diagnostics")]
pub type ChartReport<'a> = Report<'a, (String, std::ops::Range<usize>)>;

/// Trait for converting chart errors to `ariadne::Report`.
#[cfg(feature = "diagnostics")]
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    ///
    /// # Parameters
    /// * `src` - Source file container (used for filename, ariadne handles row/column calculation)
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> ChartReport<'a>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> ChartReport<'a> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

#[cfg(feature = "diagnostics")]
impl ToAriadne for ExtractError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> ChartReport<'a> {
        match *self {
            Self::NoObject => build_report(
                src,
                ReportKind::Error,
                0..src.text().len(),
                "no JSON object in the chart",
                "expected a `{` somewhere in this text",
                Color::Red,
            ),
            Self::Unterminated { start, .. } => build_report(
                src,
                ReportKind::Error,
                start..start + 1,
                "unterminated JSON object",
                "this brace is never closed",
                Color::Red,
            ),
        }
    }
}

#[cfg(feature = "diagnostics")]
impl ToAriadne for MalformedChart {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> ChartReport<'a> {
        if let Self::Extract(err) = self {
            return err.to_report(src);
        }
        build_report(
            src,
            ReportKind::Error,
            0..src.text().len(),
            "malformed chart",
            self,
            Color::Red,
        )
    }
}

/// Convenience method: render a chart parsing error to the standard error.
///
/// # Parameters
/// * `name` - Name of the source file, used for display in diagnostic information
/// * `source` - Complete chart text
/// * `error` - The error to display
#[cfg(feature = "diagnostics")]
pub fn emit_chart_error(name: &str, source: &str, error: &MalformedChart) {
    let simple = SimpleSource::new(name, source);
    let _ = error
        .to_report(&simple)
        .eprint((name.to_string(), Source::from(source)));
}

/// Convenience method: render an extraction error to the standard error.
#[cfg(feature = "diagnostics")]
pub fn emit_extract_error(name: &str, source: &str, error: &ExtractError) {
    let simple = SimpleSource::new(name, source);
    let _ = error
        .to_report(&simple)
        .eprint((name.to_string(), Source::from(source)));
}

/// Render a report into a string instead of the standard error.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn render_report(name: &str, source: &str, error: &impl ToAriadne) -> String {
    let simple = SimpleSource::new(name, source);
    let mut out = Vec::new();
    let report = error.to_report(&simple);
    if report
        .write((name.to_string(), Source::from(source)), &mut out)
        .is_err()
    {
        return String::new();
    }
    String::from_utf8_lossy(&out).into_owned()
}
