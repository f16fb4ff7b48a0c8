//! Implementation of the specific variant of URL template expansion required by the IFT specification.
//!
//! Context: <https://w3c.github.io/IFT/Overview.html#url-templates>
//!
//! URL templates in IFT use an series of one byte opcodes to insert literals or expand template variables.
use data_encoding::BASE64URL;
use data_encoding_macro::new_encoding;
use std::io::{Cursor, Read};

use crate::patchmap::PatchId;

/// Indicates a malformed URI template was encountered.
#[derive(Debug, PartialEq, Eq)]
pub enum UrlTemplateError {
    InvalidOpCode(u8),
    UnexpectedEndOfBuffer(u8),
    InvalidUtf8,
    InvalidTemplateSyntax(String),
}

impl std::fmt::Display for UrlTemplateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UrlTemplateError::InvalidOpCode(op_code) => write!(f, "Invalid URL template encountered. Unrecognized op code ({})", op_code),
            UrlTemplateError::UnexpectedEndOfBuffer(op_code) => write!(f, "Invalid URL template encountered. Unexpected end of buffer handling literal insertion (op_code = {})", op_code),
            UrlTemplateError::InvalidUtf8 => write!(f, "Invalid utf8 literal encountered in URL template."),
            UrlTemplateError::InvalidTemplateSyntax(message) => write!(f, "Invalid URL template syntax: {}", message),
        }
    }
}

enum OpCode {
    InsertLiteral(usize),
    InsertVariable(Variable),
}

enum Variable {
    Id32,
    Digit(u8),
    Id64,
}

impl TryFrom<u8> for OpCode {
    type Error = UrlTemplateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // See: https://w3c.github.io/IFT/Overview.html#url-templates
        if value & (1 << 7) > 0 {
            Ok(OpCode::InsertVariable(value.try_into()?))
        } else if value != 0 {
            Ok(OpCode::InsertLiteral(value as usize))
        } else {
            Err(UrlTemplateError::InvalidOpCode(value))
        }
    }
}

impl TryFrom<u8> for Variable {
    type Error = UrlTemplateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // See: https://w3c.github.io/IFT/Overview.html#url-templates
        match value {
            128 => Ok(Variable::Id32),
            129 => Ok(Variable::Digit(1)),
            130 => Ok(Variable::Digit(2)),
            131 => Ok(Variable::Digit(3)),
            132 => Ok(Variable::Digit(4)),
            133 => Ok(Variable::Id64),
            _ => Err(UrlTemplateError::InvalidOpCode(value)),
        }
    }
}

struct State<'a> {
    template_bytes: Cursor<&'a [u8]>,
    output_buffer: String,
    id32_string: String,
    id64_string: String,
}

impl State<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let mut next_byte = [0u8];
        if self.template_bytes.read_exact(&mut next_byte).is_err() {
            return None;
        }
        Some(next_byte[0])
    }

    fn apply(&mut self, op_code: OpCode) -> Result<(), UrlTemplateError> {
        match op_code {
            OpCode::InsertLiteral(count) => self.copy_literals(count),
            OpCode::InsertVariable(variable) => {
                self.expand_variable(variable);
                Ok(())
            }
        }
    }

    fn copy_literals(&mut self, count: usize) -> Result<(), UrlTemplateError> {
        let mut literals = vec![0; count];
        self.template_bytes
            .read_exact(literals.as_mut_slice())
            .map_err(|_| UrlTemplateError::UnexpectedEndOfBuffer(count as u8))?;

        let literals = String::from_utf8(literals).map_err(|_| UrlTemplateError::InvalidUtf8)?;
        self.output_buffer.push_str(&literals);
        Ok(())
    }

    fn expand_variable(&mut self, variable: Variable) {
        match variable {
            Variable::Id32 => self.output_buffer.push_str(&self.id32_string),
            Variable::Digit(digit) => self
                .output_buffer
                .push(Self::id_digit(&self.id32_string, digit).into()),
            Variable::Id64 => self.output_buffer.push_str(&self.id64_string),
        };
    }

    fn id_digit(id_value: &str, digit: u8) -> u8 {
        id_value
            .len()
            .checked_sub(digit.into())
            .and_then(|index| id_value.as_bytes().get(index).copied())
            .unwrap_or(b'_')
    }
}

impl std::error::Error for UrlTemplateError {}

/// Implements url template expansion from incremental font transfer.
///
/// Specification: <https://w3c.github.io/IFT/Overview.html#url-templates>
pub(crate) fn expand_template(
    template_bytes: &[u8],
    patch_id: &PatchId,
) -> Result<String, UrlTemplateError> {
    let (id32_string, id64_string) = match &patch_id {
        PatchId::Numeric(id) => {
            let id = id.to_be_bytes();
            let id = &id[count_leading_zeroes(&id)..];
            (BASE32HEX_NO_PADDING.encode(id), BASE64URL.encode(id))
        }
        PatchId::String(id) => (BASE32HEX_NO_PADDING.encode(id), BASE64URL.encode(id)),
    };
    let id64_string = id64_string.replace("=", "%3D");

    let mut state = State {
        template_bytes: Cursor::new(template_bytes),
        output_buffer: Default::default(),
        id32_string,
        id64_string,
    };

    while let Some(next_byte) = state.next_byte() {
        state.apply(next_byte.try_into()?)?;
    }

    Ok(state.output_buffer)
}

/// Compiles a human readable URL template (using `{id}`, `{d1}`..`{d4}`, and `{id64}`
/// placeholders) into the op code encoded form consumed by [`expand_template`].
///
/// This is the inverse of the mapping [`expand_template`] applies, needed so that an encoder
/// can accept a template string from its caller and store it, pre-compiled, in a patch map.
/// There is no op code for expressing a literal `{`; escape it as `{{`.
pub(crate) fn compile_template(template: &str) -> Result<Vec<u8>, UrlTemplateError> {
    let mut out = Vec::new();
    let mut literal = String::new();

    let flush_literal = |literal: &mut String, out: &mut Vec<u8>| -> Result<(), UrlTemplateError> {
        for chunk in literal.as_bytes().chunks(127) {
            out.push(chunk.len() as u8);
            out.extend_from_slice(chunk);
        }
        literal.clear();
        Ok(())
    };

    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' {
            if chars.peek() == Some(&'{') {
                chars.next();
                literal.push('{');
                continue;
            }

            let mut token = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                token.push(c);
            }
            if !closed {
                return Err(UrlTemplateError::InvalidTemplateSyntax(format!(
                    "unterminated placeholder '{{{}'",
                    token
                )));
            }

            flush_literal(&mut literal, &mut out)?;
            let op_code = match token.as_str() {
                "id" => 128,
                "d1" => 129,
                "d2" => 130,
                "d3" => 131,
                "d4" => 132,
                "id64" => 133,
                other => {
                    return Err(UrlTemplateError::InvalidTemplateSyntax(format!(
                        "unrecognized placeholder '{{{}}}'",
                        other
                    )))
                }
            };
            out.push(op_code);
        } else {
            literal.push(c);
        }
    }
    flush_literal(&mut literal, &mut out)?;

    Ok(out)
}

const BASE32HEX_NO_PADDING: data_encoding::Encoding = new_encoding! {
    symbols: "0123456789ABCDEFGHIJKLMNOPQRSTUV",
};

fn count_leading_zeroes(id: &[u8]) -> usize {
    id.iter().take_while(|b| **b == 0).count().min(id.len() - 1)
}
