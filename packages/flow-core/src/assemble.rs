//! Record assembly: merge header-derived fields into every record block.

use std::collections::HashMap;

use crate::decode::{decode_field, DecodeOptions, DecodedValue};
use crate::error::DecodeError;
use crate::rule::RuleSet;

/// One flow record after header fields have been merged in.
pub type AssembledRecord = HashMap<String, DecodedValue>;

/// Applies a rule set to header and record buffers.
///
/// Header fields are decoded once per datagram and reused for every record
/// block of that datagram.
#[derive(Debug)]
pub struct Assembler<'a> {
    rules: &'a RuleSet,
    opts: &'a DecodeOptions,
}

impl<'a> Assembler<'a> {
    pub fn new(rules: &'a RuleSet, opts: &'a DecodeOptions) -> Self {
        Self { rules, opts }
    }

    /// Decodes all header-located fields from the header region.
    pub fn decode_header(&self, header: &[u8]) -> Result<AssembledRecord, DecodeError> {
        let mut fields = AssembledRecord::new();
        for (name, rule) in self.rules.header_rules() {
            fields.insert(name.to_string(), decode_field(header, name, rule, self.opts)?);
        }
        Ok(fields)
    }

    /// Decodes all record-located fields from one block, then overlays the
    /// header fields. On a name collision the header value wins.
    pub fn assemble(
        &self,
        block: &[u8],
        header_fields: &AssembledRecord,
    ) -> Result<AssembledRecord, DecodeError> {
        let mut record = AssembledRecord::new();
        for (name, rule) in self.rules.record_rules() {
            record.insert(name.to_string(), decode_field(block, name, rule, self.opts)?);
        }
        for (name, value) in header_fields {
            record.insert(name.clone(), value.clone());
        }
        Ok(record)
    }
}
