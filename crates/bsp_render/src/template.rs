//! Script templates with named placeholders.
//!
//! A template is literal text with placeholders such as `{design_name}` or
//! `{part}`. `{{` and `}}` stand for literal braces. Templates are parsed
//! eagerly, so an unknown placeholder or a stray brace is reported when the
//! override is set, not when a build runs.
//!
//! Substitution is purely textual. Values are inserted verbatim, without any
//! quoting for the target script language.

use bsp_platform::PlatformDescriptor;
use std::fmt;
use std::str::FromStr;

/// A value a template can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// `{design_name}`: the name given to the build artifacts.
    DesignName,
    /// `{device}`: the FPGA device.
    Device,
    /// `{package}`: the FPGA package.
    Package,
    /// `{speed}`: the speed grade.
    Speed,
    /// `{part}`: the full part string.
    Part,
    /// `{board}`: the board name.
    Board,
}

impl Placeholder {
    /// Every placeholder, in documentation order.
    pub const ALL: [Placeholder; 6] = [
        Placeholder::DesignName,
        Placeholder::Device,
        Placeholder::Package,
        Placeholder::Speed,
        Placeholder::Part,
        Placeholder::Board,
    ];

    /// Returns the name written between braces.
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::DesignName => "design_name",
            Placeholder::Device => "device",
            Placeholder::Package => "package",
            Placeholder::Speed => "speed",
            Placeholder::Part => "part",
            Placeholder::Board => "board",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// The typed values available to templates and generators.
#[derive(Debug, Clone, Copy)]
pub struct TemplateParams<'a> {
    /// The design name.
    pub design_name: &'a str,
    /// The board being built for.
    pub platform: &'a PlatformDescriptor,
}

impl<'a> TemplateParams<'a> {
    /// Bundles the parameters of one render.
    pub fn new(design_name: &'a str, platform: &'a PlatformDescriptor) -> Self {
        Self {
            design_name,
            platform,
        }
    }

    /// Returns the text a placeholder stands for.
    pub fn value(&self, placeholder: Placeholder) -> String {
        let (device, package, speed) = self.platform.device_triplet();
        match placeholder {
            Placeholder::DesignName => self.design_name.to_string(),
            Placeholder::Device => device.to_string(),
            Placeholder::Package => package.to_string(),
            Placeholder::Speed => speed.to_string(),
            Placeholder::Part => self.platform.part(),
            Placeholder::Board => self.platform.name().to_string(),
        }
    }
}

/// A malformed template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {offset}")]
pub struct TemplateError {
    /// Byte offset of the problem.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses a template.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '{' if chars.peek().is_some_and(|&(_, c)| c == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, c)| c == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError {
                            offset,
                            message: "unclosed '{'".to_string(),
                        });
                    }
                    let placeholder =
                        Placeholder::from_name(&name).ok_or_else(|| TemplateError {
                            offset,
                            message: format!("unknown placeholder '{{{name}}}'"),
                        })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(placeholder));
                }
                '}' => {
                    return Err(TemplateError {
                        offset,
                        message: "unmatched '}'".to_string(),
                    });
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Returns the template as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Iterates over the placeholders used, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(p) => Some(*p),
            Segment::Literal(_) => None,
        })
    }

    /// Substitutes every placeholder.
    pub fn render(&self, params: &TemplateParams<'_>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(p) => out.push_str(&params.value(*p)),
            }
        }
        out
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_platform::BoardRegistry;

    fn render(template: &str, design: &str, board: &str) -> String {
        let registry = BoardRegistry::builtin().unwrap();
        let platform = registry.get(board).unwrap();
        Template::parse(template)
            .unwrap()
            .render(&TemplateParams::new(design, platform))
    }

    #[test]
    fn substitutes_all_placeholders() {
        assert_eq!(
            render(
                "{board} {device} {package} {speed} {part} {design_name}",
                "top",
                "litefury"
            ),
            "litefury xc7a100t fgg484 2L xc7a100tfgg484-2L top"
        );
    }

    #[test]
    fn escaped_braces() {
        assert_eq!(
            render("read_xdc {{{design_name}.xdc}}", "top", "picoevb"),
            "read_xdc {top.xdc}"
        );
    }

    #[test]
    fn design_name_inserted_verbatim() {
        assert_eq!(
            render("{design_name}.bit", "a b\"c", "picoevb"),
            "a b\"c.bit"
        );
    }

    #[test]
    fn unknown_placeholder() {
        let err = Template::parse("write {name}.bit").unwrap_err();
        assert_eq!(err.offset, 6);
        assert_eq!(err.message, "unknown placeholder '{name}'");
    }

    #[test]
    fn unbalanced_braces() {
        assert!(Template::parse("write {design_name").is_err());
        assert!(Template::parse("close }").is_err());
    }

    #[test]
    fn no_placeholders_is_literal() {
        let t: Template = "set_property CFGBVS VCCO [current_design]".parse().unwrap();
        assert_eq!(t.placeholders().count(), 0);
        assert_eq!(t.to_string(), "set_property CFGBVS VCCO [current_design]");
    }

    #[test]
    fn lists_placeholders() {
        let t = Template::parse("{part}/{design_name}/{part}").unwrap();
        let used: Vec<_> = t.placeholders().collect();
        assert_eq!(
            used,
            vec![Placeholder::Part, Placeholder::DesignName, Placeholder::Part]
        );
    }
}
