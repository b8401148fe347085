use crate::domain::{
    entities::ContentReference,
    value_objects::{ContentKind, Identifier, IdentifierError},
};

/// Named path parameters understood by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Param {
    Key,
    Video,
    File,
    Quality,
    Segment,
    Language,
}

impl Param {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "key" => Some(Self::Key),
            "videoId" | "video" => Some(Self::Video),
            "file" => Some(Self::File),
            "quality" => Some(Self::Quality),
            "segment" => Some(Self::Segment),
            "language" => Some(Self::Language),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(Param),
}

/// One route template such as `/download/:key/:videoId/:file`
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: String,
    kind: ContentKind,
    segments: Vec<Segment>,
}

/// Error raised for a malformed route template
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid route template {template}: {reason}")]
pub struct TemplateError {
    pub template: String,
    pub reason: String,
}

impl RoutePattern {
    /// Parse a template where `:name` marks a parameter
    pub fn parse(template: &str, kind: ContentKind) -> Result<Self, TemplateError> {
        let error = |reason: &str| TemplateError {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let segments = template
            .strip_prefix('/')
            .ok_or_else(|| error("must start with '/'"))?
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Param::parse(name)
                    .map(Segment::Param)
                    .ok_or_else(|| error(&format!("unknown parameter {name}"))),
                None if segment.is_empty() => Err(error("empty segment")),
                None => Ok(Segment::Static(segment.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pattern = Self { template: template.to_string(), kind, segments };
        if pattern.reference(&Captures::default_for(&pattern)).is_none() {
            return Err(error(&format!("missing parameters for {kind}")));
        }
        Ok(pattern)
    }

    fn static_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Static(_))).count()
    }

    /// Positions of static segments, used to break specificity ties
    fn static_positions(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Segment::Static(_)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Structural match, parameters are captured raw
    fn captures<'a>(&self, parts: &[&'a str]) -> Option<Vec<(Param, &'a str)>> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut captured = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(text) if text.eq_ignore_ascii_case(part) => {}
                Segment::Static(_) => return None,
                Segment::Param(param) => captured.push((*param, *part)),
            }
        }
        Some(captured)
    }

    fn reference(&self, captures: &Captures) -> Option<ContentReference> {
        let video = captures.video.clone()?;
        Some(match self.kind {
            ContentKind::Download => ContentReference::Download { video, file: captures.file.clone()? },
            ContentKind::Manifest => {
                ContentReference::Manifest { video, quality: captures.quality.clone()? }
            }
            ContentKind::Segment => ContentReference::Segment {
                video,
                quality: captures.quality.clone()?,
                segment: captures.segment.clone()?,
            },
            ContentKind::Subtitle => {
                ContentReference::Subtitle { video, language: captures.language.clone()? }
            }
        })
    }
}

#[derive(Debug, Default)]
struct Captures {
    key: Option<String>,
    video: Option<Identifier>,
    file: Option<Identifier>,
    quality: Option<Identifier>,
    segment: Option<Identifier>,
    language: Option<Identifier>,
}

impl Captures {
    /// Placeholder values for every parameter the pattern declares
    fn default_for(pattern: &RoutePattern) -> Self {
        let mut captures = Self::default();
        for segment in &pattern.segments {
            if let Segment::Param(param) = segment {
                // constant, always a valid identifier
                if let Ok(placeholder) = Identifier::new("x") {
                    captures.set(*param, placeholder);
                }
            }
        }
        captures
    }

    fn set(&mut self, param: Param, value: Identifier) {
        match param {
            Param::Key => self.key = Some(value.as_str().to_string()),
            Param::Video => self.video = Some(value),
            Param::File => self.file = Some(value),
            Param::Quality => self.quality = Some(value),
            Param::Segment => self.segment = Some(value),
            Param::Language => self.language = Some(value),
        }
    }
}

/// A resolved request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub template: String,
    /// Raw capability key segment, when the route carries one
    pub key: Option<String>,
    pub reference: ContentReference,
}

/// Route table resolving request paths by specificity
///
/// When several templates match a path the one with the most static
/// segments wins, ties go to the template whose static segments come
/// first. Registration order plays no part.
#[derive(Debug, Clone)]
pub struct RouteTable {
    patterns: Vec<RoutePattern>,
}

impl RouteTable {
    pub fn new(mut patterns: Vec<RoutePattern>) -> Self {
        patterns.sort_by(|a, b| {
            b.static_count()
                .cmp(&a.static_count())
                .then_with(|| a.static_positions().cmp(&b.static_positions()))
        });
        Self { patterns }
    }

    /// The five content routes served by the gateway
    pub fn standard() -> Result<Self, TemplateError> {
        Ok(Self::new(vec![
            RoutePattern::parse("/download/:key/:videoId/:file", ContentKind::Download)?,
            RoutePattern::parse("/download/:videoId/:file", ContentKind::Download)?,
            RoutePattern::parse("/:key/:videoId/subtitle/:language", ContentKind::Subtitle)?,
            RoutePattern::parse("/:key/:videoId/:quality/:segment", ContentKind::Segment)?,
            RoutePattern::parse("/:key/:videoId/:quality", ContentKind::Manifest)?,
        ]))
    }

    /// Resolve a request path
    ///
    /// Static segments compare case-insensitively and one trailing slash is
    /// ignored. `Ok(None)` when no template matches. Parameters are percent-decoded
    /// and validated once a template has been chosen; an invalid one is an
    /// error rather than a fallthrough to a less specific template.
    pub fn resolve(&self, path: &str) -> Result<Option<RouteMatch>, IdentifierError> {
        let Some(rest) = path.strip_prefix('/') else {
            return Ok(None);
        };
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Ok(None);
        }

        for pattern in &self.patterns {
            let Some(raw) = pattern.captures(&parts) else {
                continue;
            };

            let mut captures = Captures::default();
            for (param, value) in raw {
                if param == Param::Key {
                    captures.key = Some(value.to_string());
                } else {
                    captures.set(param, Identifier::from_path_segment(value)?);
                }
            }

            if let Some(reference) = pattern.reference(&captures) {
                return Ok(Some(RouteMatch {
                    template: pattern.template.clone(),
                    key: captures.key,
                    reference,
                }));
            }
        }

        Ok(None)
    }
}
