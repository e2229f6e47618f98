//! Bindings markup.
//!
//! ```xml
//! <bindings version="1">
//!   <key code="F5" source="Core">refresh</key>
//!   <ViewSelector>
//!     <key code="&lt;Ctrl&gt;+Tab" target="Core" when="released">focus-move-next</key>
//!   </ViewSelector>
//! </bindings>
//! ```
//!
//! A `<key>` inside a class element takes that class as its source. Keys
//! with no source at all are global.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::binding::{Binding, BindingFlags};
use crate::error::BindingsError;
use crate::key::{EventType, KeySpec};
use crate::keysyms;

/// Only supported value of the root `version` attribute.
const FORMAT_VERSION: &str = "1";

/// Parse a whole document. Bindings are returned in document order.
pub(crate) fn parse_bindings(text: &str, path: &Path) -> Result<Vec<Binding>, BindingsError> {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text(true);
    config.expand_empty_elements = true;

    let mut parser = Parser {
        text,
        path,
        stack: Vec::new(),
        bindings: Vec::new(),
        seen_root: false,
    };

    loop {
        let offset = parser.skip_whitespace(to_offset(reader.buffer_position()));
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                return Err(parser.error(to_offset(reader.error_position()), err.to_string()));
            }
        };
        match event {
            Event::Start(element) => parser.start(&element, offset)?,
            Event::End(_) => parser.end()?,
            Event::Text(content) => {
                let content = content
                    .unescape()
                    .map_err(|err| parser.error(offset, err.to_string()))?;
                parser.text(&content, offset)?;
            }
            Event::CData(content) => {
                let content = String::from_utf8_lossy(&content).into_owned();
                parser.text(&content, offset)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions
            _ => {}
        }
    }

    parser.finish()
}

fn to_offset(position: u64) -> usize {
    usize::try_from(position).unwrap_or(usize::MAX)
}

/// What the parser is inside of.
enum Context {
    Bindings,
    Class(String),
    Key(PendingKey),
}

/// A `<key>` whose action text is still being read.
struct PendingKey {
    class_name: Option<String>,
    spec: KeySpec,
    event_type: EventType,
    target: Option<String>,
    flags: BindingFlags,
    action: String,
    offset: usize,
}

struct Parser<'a> {
    text: &'a str,
    path: &'a Path,
    stack: Vec<Context>,
    bindings: Vec<Binding>,
    seen_root: bool,
}

impl Parser<'_> {
    fn start(&mut self, element: &BytesStart<'_>, offset: usize) -> Result<(), BindingsError> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();

        let context = match self.stack.last() {
            None => {
                if self.seen_root {
                    return Err(self.error(offset, "only one <bindings> element is allowed"));
                }
                if name != "bindings" {
                    return Err(
                        self.error(offset, format!("expected <bindings> but found <{name}>"))
                    );
                }
                self.root_attributes(element, offset)?;
                self.seen_root = true;
                Context::Bindings
            }
            Some(Context::Bindings) if name == "key" => {
                Context::Key(self.key(element, None, offset)?)
            }
            Some(Context::Bindings) => {
                if element.attributes().next().is_some() {
                    return Err(self.error(
                        offset,
                        format!("class element <{name}> takes no attributes"),
                    ));
                }
                Context::Class(name)
            }
            Some(Context::Class(class)) if name == "key" => {
                let class = class.clone();
                Context::Key(self.key(element, Some(class), offset)?)
            }
            Some(Context::Class(class)) => {
                return Err(self.error(offset, format!("unexpected <{name}> inside <{class}>")));
            }
            Some(Context::Key(_)) => {
                return Err(self.error(offset, format!("unexpected <{name}> inside <key>")));
            }
        };

        self.stack.push(context);
        Ok(())
    }

    fn end(&mut self) -> Result<(), BindingsError> {
        match self.stack.pop() {
            Some(Context::Key(pending)) => self.finish_key(pending),
            Some(Context::Bindings | Context::Class(_)) => Ok(()),
            None => Err(BindingsError::Internal("end tag without an open element".to_string())),
        }
    }

    fn text(&mut self, content: &str, offset: usize) -> Result<(), BindingsError> {
        if let Some(Context::Key(pending)) = self.stack.last_mut() {
            pending.action.push_str(content);
            return Ok(());
        }
        if content.trim().is_empty() {
            return Ok(());
        }
        Err(self.error(offset, format!("unexpected text '{}'", content.trim())))
    }

    fn finish(self) -> Result<Vec<Binding>, BindingsError> {
        let end = self.text.len();
        if !self.seen_root {
            return Err(self.error(end, "missing <bindings> element"));
        }
        if !self.stack.is_empty() {
            return Err(self.error(end, "unexpected end of document"));
        }
        tracing::debug!(
            path = %self.path.display(),
            count = self.bindings.len(),
            "parsed bindings"
        );
        Ok(self.bindings)
    }

    fn root_attributes(
        &self,
        element: &BytesStart<'_>,
        offset: usize,
    ) -> Result<(), BindingsError> {
        for (name, value) in self.attributes(element, offset)? {
            match name.as_str() {
                "version" if value == FORMAT_VERSION => {}
                "version" => {
                    return Err(
                        self.error(offset, format!("unsupported bindings version '{value}'"))
                    );
                }
                _ => {
                    return Err(
                        self.error(offset, format!("unknown attribute '{name}' on <bindings>"))
                    );
                }
            }
        }
        Ok(())
    }

    fn key(
        &self,
        element: &BytesStart<'_>,
        enclosing: Option<String>,
        offset: usize,
    ) -> Result<PendingKey, BindingsError> {
        let mut spec = None;
        let mut source = None;
        let mut event_type = EventType::default();
        let mut target = None;
        let mut flags = BindingFlags::empty();

        for (name, value) in self.attributes(element, offset)? {
            match name.as_str() {
                "code" => {
                    let parsed = KeySpec::parse(&value)
                        .and_then(|parsed| parsed.check_bindable().map(|()| parsed))
                        .map_err(|err| self.error(offset, err.to_string()))?;
                    spec = Some(parsed);
                }
                "source" => source = Some(value),
                "when" => {
                    event_type = value.parse().map_err(|_| {
                        self.error(offset, format!("invalid value '{value}' for 'when'"))
                    })?;
                }
                "target" if value.is_empty() => {
                    return Err(self.error(offset, "empty 'target' attribute"));
                }
                "target" => target = Some(value),
                "allow-unfocusable-targets" => {
                    if parse_bool(&value).ok_or_else(|| {
                        self.error(offset, format!("invalid value '{value}' for '{name}'"))
                    })? {
                        flags |= BindingFlags::ALLOW_UNFOCUSABLE_TARGET;
                    }
                }
                _ => return Err(self.error(offset, format!("unknown attribute '{name}' on <key>"))),
            }
        }

        let Some(spec) = spec else {
            return Err(self.error(offset, "missing required attribute 'code'"));
        };

        let class_name = match (enclosing, source) {
            (Some(class), Some(source)) if class != source => {
                return Err(self.error(
                    offset,
                    format!("source '{source}' conflicts with enclosing <{class}>"),
                ));
            }
            (Some(class), _) => Some(class),
            (None, source) => source.filter(|s| !s.is_empty()),
        };

        Ok(PendingKey {
            class_name,
            spec,
            event_type,
            target,
            flags,
            action: String::new(),
            offset,
        })
    }

    fn finish_key(&mut self, pending: PendingKey) -> Result<(), BindingsError> {
        let action = pending.action.trim();
        if action.is_empty() {
            return Err(self.error(
                pending.offset,
                format!("missing action for key '{}'", pending.spec),
            ));
        }

        self.bindings.push(Binding {
            class_name: pending.class_name,
            key: keysyms::to_lower(pending.spec.key),
            modifiers: pending.spec.modifiers,
            event_type: pending.event_type,
            action: action.to_string(),
            target: pending.target,
            flags: pending.flags,
        });
        Ok(())
    }

    fn attributes(
        &self,
        element: &BytesStart<'_>,
        offset: usize,
    ) -> Result<Vec<(String, String)>, BindingsError> {
        element
            .attributes()
            .map(|attr| {
                let attr = attr.map_err(|err| self.error(offset, err.to_string()))?;
                let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr
                    .unescape_value()
                    .map_err(|err| self.error(offset, err.to_string()))?
                    .into_owned();
                Ok((name, value))
            })
            .collect()
    }

    /// Advance `offset` past whitespace so errors point at the element.
    fn skip_whitespace(&self, offset: usize) -> usize {
        let rest = self.text.get(offset..).unwrap_or_default();
        offset + (rest.len() - rest.trim_start().len())
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> BindingsError {
        let (line, column) = line_column(self.text, offset);
        BindingsError::MalformedConfig {
            path: self.path.to_path_buf(),
            line,
            column,
            message: message.into(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// 1-based line and column of a byte offset.
fn line_column(text: &str, offset: usize) -> (u32, u32) {
    let bytes = text.as_bytes();
    let prefix = &bytes[..offset.min(bytes.len())];
    let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = prefix.iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
    let column = String::from_utf8_lossy(&prefix[line_start..]).chars().count() + 1;
    (
        u32::try_from(line).unwrap_or(u32::MAX),
        u32::try_from(column).unwrap_or(u32::MAX),
    )
}
