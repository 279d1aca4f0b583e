use std::{collections::HashMap, fmt};

use crate::errors::{Error, Result};

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is fully opaque.
    pub a: u8,
}

impl Rgba {
    /// Creates a color from individual channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, u8::MAX)
    }

    /// Returns the channels in RGBA order, matching decoded pixel buffers.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Creates a color from channels in RGBA order.
    #[must_use]
    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }

    /// Resolves a color string: `#`-prefixed hex digits or a CSS3 color name.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is neither valid hex nor a known name.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            Self::from_hex(s)
        } else {
            Self::from_name(s)
        }
    }

    /// Parses 3, 4, 6 or 8 hex digits with an optional leading `#`.
    /// Shorthand digits are doubled, so `#f80` equals `#ff8800`.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit count or any digit is invalid.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let err = || Error::Color(format!("invalid hex digits in '{hex}'"));
        if !hex.is_ascii() {
            return Err(err());
        }
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..=i], 16)
                .map(|v| v * 0x11)
                .map_err(|_| err())
        };
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(match hex.len() {
            3 => Self::new(nibble(0)?, nibble(1)?, nibble(2)?, u8::MAX),
            4 => Self::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
            6 => Self::new(pair(0)?, pair(2)?, pair(4)?, u8::MAX),
            8 => Self::new(pair(0)?, pair(2)?, pair(4)?, pair(6)?),
            n => {
                return Err(Error::Color(format!(
                    "hex color '{hex}' has {n} digits, expected 3, 4, 6 or 8"
                )))
            }
        })
    }

    /// Resolves a CSS3 extended color name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not in the CSS3 list.
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|&(_, c)| c)
            .ok_or_else(|| Error::Color(format!("unknown color name '{name}'")))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != u8::MAX {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

/// An ordered set of color replacement rules.
///
/// Rules keep the order they were declared in. When two rule keys resolve
/// to the same source color, the first rule wins.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    rules: Vec<(Rgba, Rgba)>,
    lookup: HashMap<Rgba, Rgba>,
}

impl ColorMap {
    /// Builds a map from `(source, replacement)` color string pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any color string cannot be resolved.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rules = Vec::new();
        let mut lookup = HashMap::new();
        for (src, dst) in pairs {
            let (src, dst) = (Rgba::parse(src)?, Rgba::parse(dst)?);
            lookup.entry(src).or_insert(dst);
            rules.push((src, dst));
        }
        Ok(Self { rules, lookup })
    }

    /// Returns the replacement for a color if a rule matches it exactly,
    /// alpha included.
    #[must_use]
    pub fn swap(&self, color: Rgba) -> Option<Rgba> {
        self.lookup.get(&color).copied()
    }

    /// Returns the parsed rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[(Rgba, Rgba)] {
        &self.rules
    }

    /// Checks if the map has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rule count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

static NAMED: &[(&str, Rgba)] = &[
    ("aliceblue", Rgba::opaque(0xf0, 0xf8, 0xff)),
    ("antiquewhite", Rgba::opaque(0xfa, 0xeb, 0xd7)),
    ("aqua", Rgba::opaque(0x00, 0xff, 0xff)),
    ("aquamarine", Rgba::opaque(0x7f, 0xff, 0xd4)),
    ("azure", Rgba::opaque(0xf0, 0xff, 0xff)),
    ("beige", Rgba::opaque(0xf5, 0xf5, 0xdc)),
    ("bisque", Rgba::opaque(0xff, 0xe4, 0xc4)),
    ("black", Rgba::opaque(0x00, 0x00, 0x00)),
    ("blanchedalmond", Rgba::opaque(0xff, 0xeb, 0xcd)),
    ("blue", Rgba::opaque(0x00, 0x00, 0xff)),
    ("blueviolet", Rgba::opaque(0x8a, 0x2b, 0xe2)),
    ("brown", Rgba::opaque(0xa5, 0x2a, 0x2a)),
    ("burlywood", Rgba::opaque(0xde, 0xb8, 0x87)),
    ("cadetblue", Rgba::opaque(0x5f, 0x9e, 0xa0)),
    ("chartreuse", Rgba::opaque(0x7f, 0xff, 0x00)),
    ("chocolate", Rgba::opaque(0xd2, 0x69, 0x1e)),
    ("coral", Rgba::opaque(0xff, 0x7f, 0x50)),
    ("cornflowerblue", Rgba::opaque(0x64, 0x95, 0xed)),
    ("cornsilk", Rgba::opaque(0xff, 0xf8, 0xdc)),
    ("crimson", Rgba::opaque(0xdc, 0x14, 0x3c)),
    ("cyan", Rgba::opaque(0x00, 0xff, 0xff)),
    ("darkblue", Rgba::opaque(0x00, 0x00, 0x8b)),
    ("darkcyan", Rgba::opaque(0x00, 0x8b, 0x8b)),
    ("darkgoldenrod", Rgba::opaque(0xb8, 0x86, 0x0b)),
    ("darkgray", Rgba::opaque(0xa9, 0xa9, 0xa9)),
    ("darkgreen", Rgba::opaque(0x00, 0x64, 0x00)),
    ("darkgrey", Rgba::opaque(0xa9, 0xa9, 0xa9)),
    ("darkkhaki", Rgba::opaque(0xbd, 0xb7, 0x6b)),
    ("darkmagenta", Rgba::opaque(0x8b, 0x00, 0x8b)),
    ("darkolivegreen", Rgba::opaque(0x55, 0x6b, 0x2f)),
    ("darkorange", Rgba::opaque(0xff, 0x8c, 0x00)),
    ("darkorchid", Rgba::opaque(0x99, 0x32, 0xcc)),
    ("darkred", Rgba::opaque(0x8b, 0x00, 0x00)),
    ("darksalmon", Rgba::opaque(0xe9, 0x96, 0x7a)),
    ("darkseagreen", Rgba::opaque(0x8f, 0xbc, 0x8f)),
    ("darkslateblue", Rgba::opaque(0x48, 0x3d, 0x8b)),
    ("darkslategray", Rgba::opaque(0x2f, 0x4f, 0x4f)),
    ("darkslategrey", Rgba::opaque(0x2f, 0x4f, 0x4f)),
    ("darkturquoise", Rgba::opaque(0x00, 0xce, 0xd1)),
    ("darkviolet", Rgba::opaque(0x94, 0x00, 0xd3)),
    ("deeppink", Rgba::opaque(0xff, 0x14, 0x93)),
    ("deepskyblue", Rgba::opaque(0x00, 0xbf, 0xff)),
    ("dimgray", Rgba::opaque(0x69, 0x69, 0x69)),
    ("dimgrey", Rgba::opaque(0x69, 0x69, 0x69)),
    ("dodgerblue", Rgba::opaque(0x1e, 0x90, 0xff)),
    ("firebrick", Rgba::opaque(0xb2, 0x22, 0x22)),
    ("floralwhite", Rgba::opaque(0xff, 0xfa, 0xf0)),
    ("forestgreen", Rgba::opaque(0x22, 0x8b, 0x22)),
    ("fuchsia", Rgba::opaque(0xff, 0x00, 0xff)),
    ("gainsboro", Rgba::opaque(0xdc, 0xdc, 0xdc)),
    ("ghostwhite", Rgba::opaque(0xf8, 0xf8, 0xff)),
    ("gold", Rgba::opaque(0xff, 0xd7, 0x00)),
    ("goldenrod", Rgba::opaque(0xda, 0xa5, 0x20)),
    ("gray", Rgba::opaque(0x80, 0x80, 0x80)),
    ("green", Rgba::opaque(0x00, 0x80, 0x00)),
    ("greenyellow", Rgba::opaque(0xad, 0xff, 0x2f)),
    ("grey", Rgba::opaque(0x80, 0x80, 0x80)),
    ("honeydew", Rgba::opaque(0xf0, 0xff, 0xf0)),
    ("hotpink", Rgba::opaque(0xff, 0x69, 0xb4)),
    ("indianred", Rgba::opaque(0xcd, 0x5c, 0x5c)),
    ("indigo", Rgba::opaque(0x4b, 0x00, 0x82)),
    ("ivory", Rgba::opaque(0xff, 0xff, 0xf0)),
    ("khaki", Rgba::opaque(0xf0, 0xe6, 0x8c)),
    ("lavender", Rgba::opaque(0xe6, 0xe6, 0xfa)),
    ("lavenderblush", Rgba::opaque(0xff, 0xf0, 0xf5)),
    ("lawngreen", Rgba::opaque(0x7c, 0xfc, 0x00)),
    ("lemonchiffon", Rgba::opaque(0xff, 0xfa, 0xcd)),
    ("lightblue", Rgba::opaque(0xad, 0xd8, 0xe6)),
    ("lightcoral", Rgba::opaque(0xf0, 0x80, 0x80)),
    ("lightcyan", Rgba::opaque(0xe0, 0xff, 0xff)),
    ("lightgoldenrodyellow", Rgba::opaque(0xfa, 0xfa, 0xd2)),
    ("lightgray", Rgba::opaque(0xd3, 0xd3, 0xd3)),
    ("lightgreen", Rgba::opaque(0x90, 0xee, 0x90)),
    ("lightgrey", Rgba::opaque(0xd3, 0xd3, 0xd3)),
    ("lightpink", Rgba::opaque(0xff, 0xb6, 0xc1)),
    ("lightsalmon", Rgba::opaque(0xff, 0xa0, 0x7a)),
    ("lightseagreen", Rgba::opaque(0x20, 0xb2, 0xaa)),
    ("lightskyblue", Rgba::opaque(0x87, 0xce, 0xfa)),
    ("lightslategray", Rgba::opaque(0x77, 0x88, 0x99)),
    ("lightslategrey", Rgba::opaque(0x77, 0x88, 0x99)),
    ("lightsteelblue", Rgba::opaque(0xb0, 0xc4, 0xde)),
    ("lightyellow", Rgba::opaque(0xff, 0xff, 0xe0)),
    ("lime", Rgba::opaque(0x00, 0xff, 0x00)),
    ("limegreen", Rgba::opaque(0x32, 0xcd, 0x32)),
    ("linen", Rgba::opaque(0xfa, 0xf0, 0xe6)),
    ("magenta", Rgba::opaque(0xff, 0x00, 0xff)),
    ("maroon", Rgba::opaque(0x80, 0x00, 0x00)),
    ("mediumaquamarine", Rgba::opaque(0x66, 0xcd, 0xaa)),
    ("mediumblue", Rgba::opaque(0x00, 0x00, 0xcd)),
    ("mediumorchid", Rgba::opaque(0xba, 0x55, 0xd3)),
    ("mediumpurple", Rgba::opaque(0x93, 0x70, 0xdb)),
    ("mediumseagreen", Rgba::opaque(0x3c, 0xb3, 0x71)),
    ("mediumslateblue", Rgba::opaque(0x7b, 0x68, 0xee)),
    ("mediumspringgreen", Rgba::opaque(0x00, 0xfa, 0x9a)),
    ("mediumturquoise", Rgba::opaque(0x48, 0xd1, 0xcc)),
    ("mediumvioletred", Rgba::opaque(0xc7, 0x15, 0x85)),
    ("midnightblue", Rgba::opaque(0x19, 0x19, 0x70)),
    ("mintcream", Rgba::opaque(0xf5, 0xff, 0xfa)),
    ("mistyrose", Rgba::opaque(0xff, 0xe4, 0xe1)),
    ("moccasin", Rgba::opaque(0xff, 0xe4, 0xb5)),
    ("navajowhite", Rgba::opaque(0xff, 0xde, 0xad)),
    ("navy", Rgba::opaque(0x00, 0x00, 0x80)),
    ("oldlace", Rgba::opaque(0xfd, 0xf5, 0xe6)),
    ("olive", Rgba::opaque(0x80, 0x80, 0x00)),
    ("olivedrab", Rgba::opaque(0x6b, 0x8e, 0x23)),
    ("orange", Rgba::opaque(0xff, 0xa5, 0x00)),
    ("orangered", Rgba::opaque(0xff, 0x45, 0x00)),
    ("orchid", Rgba::opaque(0xda, 0x70, 0xd6)),
    ("palegoldenrod", Rgba::opaque(0xee, 0xe8, 0xaa)),
    ("palegreen", Rgba::opaque(0x98, 0xfb, 0x98)),
    ("paleturquoise", Rgba::opaque(0xaf, 0xee, 0xee)),
    ("palevioletred", Rgba::opaque(0xdb, 0x70, 0x93)),
    ("papayawhip", Rgba::opaque(0xff, 0xef, 0xd5)),
    ("peachpuff", Rgba::opaque(0xff, 0xda, 0xb9)),
    ("peru", Rgba::opaque(0xcd, 0x85, 0x3f)),
    ("pink", Rgba::opaque(0xff, 0xc0, 0xcb)),
    ("plum", Rgba::opaque(0xdd, 0xa0, 0xdd)),
    ("powderblue", Rgba::opaque(0xb0, 0xe0, 0xe6)),
    ("purple", Rgba::opaque(0x80, 0x00, 0x80)),
    ("rebeccapurple", Rgba::opaque(0x66, 0x33, 0x99)),
    ("red", Rgba::opaque(0xff, 0x00, 0x00)),
    ("rosybrown", Rgba::opaque(0xbc, 0x8f, 0x8f)),
    ("royalblue", Rgba::opaque(0x41, 0x69, 0xe1)),
    ("saddlebrown", Rgba::opaque(0x8b, 0x45, 0x13)),
    ("salmon", Rgba::opaque(0xfa, 0x80, 0x72)),
    ("sandybrown", Rgba::opaque(0xf4, 0xa4, 0x60)),
    ("seagreen", Rgba::opaque(0x2e, 0x8b, 0x57)),
    ("seashell", Rgba::opaque(0xff, 0xf5, 0xee)),
    ("sienna", Rgba::opaque(0xa0, 0x52, 0x2d)),
    ("silver", Rgba::opaque(0xc0, 0xc0, 0xc0)),
    ("skyblue", Rgba::opaque(0x87, 0xce, 0xeb)),
    ("slateblue", Rgba::opaque(0x6a, 0x5a, 0xcd)),
    ("slategray", Rgba::opaque(0x70, 0x80, 0x90)),
    ("slategrey", Rgba::opaque(0x70, 0x80, 0x90)),
    ("snow", Rgba::opaque(0xff, 0xfa, 0xfa)),
    ("springgreen", Rgba::opaque(0x00, 0xff, 0x7f)),
    ("steelblue", Rgba::opaque(0x46, 0x82, 0xb4)),
    ("tan", Rgba::opaque(0xd2, 0xb4, 0x8c)),
    ("teal", Rgba::opaque(0x00, 0x80, 0x80)),
    ("thistle", Rgba::opaque(0xd8, 0xbf, 0xd8)),
    ("tomato", Rgba::opaque(0xff, 0x63, 0x47)),
    ("turquoise", Rgba::opaque(0x40, 0xe0, 0xd0)),
    ("violet", Rgba::opaque(0xee, 0x82, 0xee)),
    ("wheat", Rgba::opaque(0xf5, 0xde, 0xb3)),
    ("white", Rgba::opaque(0xff, 0xff, 0xff)),
    ("whitesmoke", Rgba::opaque(0xf5, 0xf5, 0xf5)),
    ("yellow", Rgba::opaque(0xff, 0xff, 0x00)),
    ("yellowgreen", Rgba::opaque(0x9a, 0xcd, 0x32)),
];
