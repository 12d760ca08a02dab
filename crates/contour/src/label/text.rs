//! Label text formatting.

use super::config::{LabelText, Placement};
use super::policy::{Acceptance, Candidate};

/// Decimals needed to print multiples of `step` exactly (at most 6).
pub fn decimals_for(step: f64) -> usize {
    let mut scaled = step.abs();
    for decimals in 0..6 {
        if (scaled - scaled.round()).abs() < 1e-9 * scaled.max(1.0) {
            return decimals;
        }
        scaled *= 10.0;
    }
    6
}

/// Format a value with `decimals`, or with none/one decimal when unset.
pub fn format_value(value: f64, decimals: Option<usize>) -> String {
    match decimals {
        Some(d) => format!("{:.*}", d, value),
        None if value.fract().abs() < 0.01 => format!("{:.0}", value),
        None => format!("{:.1}", value),
    }
}

/// Attach prefix and unit; a leading '-' joins without a space.
pub fn decorate(body: &str, prefix: Option<&str>, unit: Option<&str>) -> String {
    let mut out = String::with_capacity(body.len() + 8);
    if let Some(prefix) = prefix {
        match prefix.strip_prefix('-') {
            Some(tight) => out.push_str(tight),
            None => {
                out.push_str(prefix);
                out.push(' ');
            }
        }
    }
    out.push_str(body);
    if let Some(unit) = unit {
        match unit.strip_prefix('-') {
            Some(tight) => out.push_str(tight),
            None => {
                out.push(' ');
                out.push_str(unit);
            }
        }
    }
    out
}

/// Text for a candidate; None when the mode has nothing to say.
pub(crate) fn label_text(ctx: &Acceptance<'_>, c: &Candidate) -> Option<String> {
    let config = ctx.config;
    let decimals = match &config.placement {
        Placement::Spacing(p) if p.spacing > 0.0 => Some(decimals_for(p.spacing)),
        _ => None,
    };

    let (body, with_unit) = match &config.text {
        LabelText::Contour => (ctx.info.text.to_string(), true),
        LabelText::Constant { text } => (text.clone(), false),
        LabelText::Header => (ctx.info.header?.to_string(), false),
        LabelText::PlotDistance { scale } => {
            let d = ctx.arcs.plot_at(c.segment, c.fraction) * scale;
            (format_value(d, decimals), true)
        }
        LabelText::MapDistance => {
            let d = ctx.arcs.map_at(c.segment, c.fraction)?;
            (format_value(d, decimals), true)
        }
        LabelText::SegmentIndex => (ctx.info.segment.to_string(), false),
        LabelText::TableSegment => (format!("{}/{}", ctx.info.table, ctx.info.segment), false),
        LabelText::FixedPoint => match &config.placement {
            Placement::Fixed(p) => (p.points.get(c.source?)?.label.clone()?, false),
            _ => return None,
        },
        LabelText::CrossingLine => match &config.placement {
            Placement::Crossing(p) => (p.lines.get(c.source?)?.label.clone()?, false),
            _ => return None,
        },
    };

    if body.is_empty() {
        return None;
    }
    let unit = if with_unit { config.unit.as_deref() } else { None };
    Some(decorate(&body, config.prefix.as_deref(), unit))
}
