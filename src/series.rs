//! Homogeneous series: elements of one format stored back to back, each
//! preceded by its own BER length.

use crate::errors::*;
use crate::format::{type_error, Context, Format};
use crate::length_constraints::LengthConstraints;
use crate::read_write::{ber_length, read_ber, write_ber, Cursor};
use crate::registry::Standard;
use crate::value::KlvValue;

pub struct SeriesFormat {
    element: Box<dyn Format>,
    constraints: LengthConstraints,
}

impl SeriesFormat {
    pub fn new(element: impl Format + 'static) -> Self {
        Self {
            element: Box::new(element),
            constraints: LengthConstraints::free(),
        }
    }

    pub fn element(&self) -> &dyn Format {
        self.element.as_ref()
    }
}

impl Format for SeriesFormat {
    fn description(&self) -> String {
        format!("series of {} of {}", self.element.description(), self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, ctx: &Context<'_>) -> Result<KlvValue, KlvError> {
        let ctx = ctx.descend()?;
        let mut body = cur.sub(length)?;
        let mut items = Vec::new();
        while !body.is_empty() {
            let offset = body.position();
            let item_length = read_ber(&mut body)?;
            let item_length = usize::try_from(item_length)
                .ok()
                .filter(|&n| n <= body.remaining())
                .ok_or_else(|| {
                    KlvError::new(
                        ERR_LENGTH,
                        format!("series element of {item_length} bytes overruns series"),
                    )
                    .at(offset)
                })?;
            items.push(self.element.read(&mut body, item_length, &ctx)?);
        }
        Ok(KlvValue::Series(items))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, ctx: &Context<'_>) -> Result<(), KlvError> {
        let ctx = ctx.descend()?;
        let items = value.as_series().ok_or_else(|| type_error("series", value))?;
        for item in items {
            let length = self.element.length_of(item, &ctx)?;
            write_ber(length as u64, out);
            self.element.write(item, out, length, &ctx)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> Result<usize, KlvError> {
        let ctx = ctx.descend()?;
        let items = value.as_series().ok_or_else(|| type_error("series", value))?;
        items.iter().try_fold(0usize, |total, item| {
            let length = self.element.length_of(item, &ctx)?;
            Ok(total + ber_length(length as u64) + length)
        })
    }

    fn print_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> String {
        let (Some(items), Ok(ctx)) = (value.as_series(), ctx.descend()) else {
            return value.to_string();
        };
        let printed: Vec<String> = items.iter().map(|item| self.element.print(item, &ctx)).collect();
        format!("[ {} ]", printed.join(", "))
    }

    fn subset(&self) -> Option<Standard> {
        self.element.subset()
    }
}
