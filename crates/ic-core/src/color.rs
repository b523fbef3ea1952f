//! CSS color validation.
//!
//! The engine stores colors as the CSS strings the user picked and only
//! checks that they are well-formed: `#RGB`, `#RGBA`, `#RRGGBB`,
//! `#RRGGBBAA`, `rgb()/rgba()/hsl()/hsla()` functional notation (comma or
//! space separated, optional `/ alpha`), and the CSS named colors.

use crate::error::ModelError;
use winnow::ascii::{float, space0, space1};
use winnow::combinator::{alt, delimited, opt, separated};
use winnow::prelude::*;

/// The literal accepted for rectangle fills meaning "no fill".
pub const NONE: &str = "none";

/// The literal accepted for canvas backgrounds meaning "checker pattern".
pub const TRANSPARENT: &str = "transparent";

/// Returns true when `s` is a valid CSS color.
pub fn is_css_color(s: &str) -> bool {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    if s.contains('(') {
        let lower = s.to_ascii_lowercase();
        return functional_color.parse(lower.as_str()).is_ok();
    }
    s.eq_ignore_ascii_case(TRANSPARENT)
        || s.eq_ignore_ascii_case("currentcolor")
        || NAMED_COLORS
            .binary_search(&s.to_ascii_lowercase().as_str())
            .is_ok()
}

/// Validate a stroke color.
pub fn check_color(s: &str) -> Result<(), ModelError> {
    if is_css_color(s) {
        Ok(())
    } else {
        Err(ModelError::InvalidColor(s.to_string()))
    }
}

/// Validate a fill: a CSS color or `"none"`.
pub fn check_fill(s: &str) -> Result<(), ModelError> {
    if s == NONE { Ok(()) } else { check_color(s) }
}

// ─── Functional notation ────────────────────────────────────────────────

fn functional_color(input: &mut &str) -> ModalResult<()> {
    let _ = alt(("rgba", "rgb", "hsla", "hsl")).parse_next(input)?;
    let args: Vec<f64> =
        delimited(('(', space0), separated(3..=4, component, arg_separator), (space0, ')'))
            .parse_next(input)?;
    if args.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(winnow::error::ErrMode::Backtrack(
            winnow::error::ContextError::new(),
        ))
    }
}

fn component(input: &mut &str) -> ModalResult<f64> {
    let value: f64 = float.parse_next(input)?;
    let _ = opt(alt(("%", "deg", "turn", "rad"))).parse_next(input)?;
    Ok(value)
}

fn arg_separator(input: &mut &str) -> ModalResult<()> {
    alt(((space0, ',', space0).void(), (space0, '/', space0).void(), space1.void()))
        .parse_next(input)
}

/// CSS named colors, sorted for binary search.
const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue", "darkcyan",
    "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki", "darkmagenta",
    "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon", "darkseagreen",
    "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise", "darkviolet", "deeppink",
    "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick", "floralwhite", "forestgreen",
    "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod", "gray", "green", "greenyellow",
    "grey", "honeydew", "hotpink", "indianred", "indigo", "ivory", "khaki", "lavender",
    "lavenderblush", "lawngreen", "lemonchiffon", "lightblue", "lightcoral", "lightcyan",
    "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey", "lightpink", "lightsalmon",
    "lightseagreen", "lightskyblue", "lightslategray", "lightslategrey", "lightsteelblue",
    "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon", "mediumaquamarine",
    "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen", "mediumslateblue",
    "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue", "mintcream",
    "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab", "orange",
    "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise", "palevioletred",
    "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple", "rebeccapurple",
    "red", "rosybrown", "royalblue", "saddlebrown", "salmon", "sandybrown", "seagreen",
    "seashell", "sienna", "silver", "skyblue", "slateblue", "slategray", "slategrey", "snow",
    "springgreen", "steelblue", "tan", "teal", "thistle", "tomato", "turquoise", "violet",
    "wheat", "white", "whitesmoke", "yellow", "yellowgreen",
];
