//! Label templates: `{{.Field}}` placeholders rendered per package.
//!
//! Templates are parsed up front so a bad format is reported before any
//! snapshot is loaded or expression evaluated.

use anyhow::{anyhow, bail, Result};
use pkgsel_core::query::parser::typo_detection::find_closest_name;
use pkgsel_core::Package;

/// Placeholder names accepted inside `{{. }}`.
pub const FIELD_NAMES: [&str; 7] = [
    "ID",
    "Path",
    "Module",
    "Version",
    "Repository",
    "Imports",
    "Variant",
];

/// Package attribute a placeholder expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Unique identifier
    Id,
    /// Import path
    Path,
    /// Owning module path, empty when unknown
    Module,
    /// Owning module version, empty for local modules
    Version,
    /// Repository root, empty when unknown
    Repository,
    /// Number of direct imports in the snapshot
    Imports,
    /// `true` for verification variants
    Variant,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ID" => Self::Id,
            "Path" => Self::Path,
            "Module" => Self::Module,
            "Version" => Self::Version,
            "Repository" => Self::Repository,
            "Imports" => Self::Imports,
            "Variant" => Self::Variant,
            _ => return None,
        })
    }

    fn write(self, out: &mut String, package: &Package, id: &str) {
        let module = package.module.as_ref();
        match self {
            Self::Id => out.push_str(id),
            Self::Path => out.push_str(&package.path),
            Self::Module => out.push_str(module.map_or("", |m| m.path.as_str())),
            Self::Version => {
                out.push_str(module.and_then(|m| m.version.as_deref()).unwrap_or(""));
            }
            Self::Repository => out.push_str(package.repository.as_deref().unwrap_or("")),
            Self::Imports => out.push_str(&package.imports.len().to_string()),
            Self::Variant => out.push_str(if package.is_variant() { "true" } else { "false" }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// Parsed label template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTemplate {
    segments: Vec<Segment>,
}

impl LabelTemplate {
    /// Parse `text`, accepting whitespace inside the braces.
    ///
    /// # Errors
    /// Fails on an unterminated `{{`, a placeholder not starting with `.`,
    /// or an unknown field name.
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = text;
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Text(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                bail!(
                    "unterminated placeholder at offset {}\n  Expected: '}}}}' closing the '{{{{'\n  Example: {{{{.ID}}}}",
                    offset + open
                );
            };

            let inner = after_open[..close].trim();
            let Some(name) = inner.strip_prefix('.') else {
                bail!("placeholder '{{{{{inner}}}}}' must name a field such as '.ID'");
            };
            let field = Field::from_name(name).ok_or_else(|| unknown_field(name))?;
            segments.push(Segment::Field(field));

            let consumed = open + 2 + close + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Render for one package.
    #[must_use]
    pub fn render(&self, package: &Package) -> String {
        self.render_with_id(package, &package.id)
    }

    /// Render for one package with `.ID` replaced by `id`.
    #[must_use]
    pub fn render_with_id(&self, package: &Package, id: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(field) => field.write(&mut out, package, id),
            }
        }
        out
    }
}

fn unknown_field(name: &str) -> anyhow::Error {
    let hint = find_closest_name(name, FIELD_NAMES)
        .map(|closest| format!("\n  Suggestion: Did you mean '.{closest}'?"))
        .unwrap_or_default();
    anyhow!(
        "unknown template field '.{name}'{hint}\n  Available: {}",
        FIELD_NAMES.map(|field| format!(".{field}")).join(", ")
    )
}
