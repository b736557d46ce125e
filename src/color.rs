//! # Color Scheme Compilation
//!
//! Turns a declarative [`ColorScheme`] (one style name per slot) into a
//! [`CompiledColorScheme`] of ready-to-apply [`ColorTransform`]s.
//!
//! ## Style Names
//!
//! A style name has the form `fg[+attrs][:bg[+attrs]]`:
//!
//! - **Colors**: `black`, `red`, `green`, `yellow`, `blue`, `magenta`, `cyan`,
//!   `white`, `default` (leave the terminal color alone), or an xterm-256
//!   palette index such as `208`
//! - **Foreground attributes**: `b` bold, `B` blink, `d` dim, `i` inverse,
//!   `s` strikethrough, `u` underline, `h` high intensity
//! - **Background attributes**: `h` high intensity
//!
//! Examples: `"red"`, `"black+h"`, `"yellow+bu"`, `"white:blue+h"`, `"208"`.
//!
//! ## Fallback Rules
//!
//! Compilation never fails. An empty slot takes the matching slot of
//! [`DEFAULT_COLOR_SCHEME`]; a name that cannot be parsed compiles to the
//! identity transform so the text is printed without color.

use std::borrow::Cow;

use colored::{Color, Colorize};

use crate::record::Level;

/// Addressable slots of a color scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleSlot {
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
    Debug,
    Prefix,
    Timestamp,
}

impl StyleSlot {
    /// Every slot, in declaration order.
    pub const ALL: [StyleSlot; 8] = [
        StyleSlot::Info,
        StyleSlot::Warn,
        StyleSlot::Error,
        StyleSlot::Fatal,
        StyleSlot::Panic,
        StyleSlot::Debug,
        StyleSlot::Prefix,
        StyleSlot::Timestamp,
    ];

    /// Slot holding the color of a level tag.
    ///
    /// `Trace` has no slot of its own and shares the debug color.
    pub fn for_level(level: Level) -> StyleSlot {
        match level {
            Level::Debug => StyleSlot::Debug,
            Level::Info => StyleSlot::Info,
            Level::Warn => StyleSlot::Warn,
            Level::Error => StyleSlot::Error,
            Level::Fatal => StyleSlot::Fatal,
            Level::Panic => StyleSlot::Panic,
            _ => StyleSlot::Debug,
        }
    }
}

/// Declarative color scheme: one style name per slot.
///
/// An empty style name means "use the default for this slot".
/// `ColorScheme::default()` leaves every slot empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorScheme {
    pub info: Cow<'static, str>,
    pub warn: Cow<'static, str>,
    pub error: Cow<'static, str>,
    pub fatal: Cow<'static, str>,
    pub panic: Cow<'static, str>,
    pub debug: Cow<'static, str>,
    pub prefix: Cow<'static, str>,
    pub timestamp: Cow<'static, str>,
}

/// Fallback styles used for every empty slot during compilation.
pub const DEFAULT_COLOR_SCHEME: ColorScheme = ColorScheme {
    info: Cow::Borrowed("green"),
    warn: Cow::Borrowed("yellow"),
    error: Cow::Borrowed("red"),
    fatal: Cow::Borrowed("red"),
    panic: Cow::Borrowed("red"),
    debug: Cow::Borrowed("blue"),
    prefix: Cow::Borrowed("cyan"),
    timestamp: Cow::Borrowed("black+h"),
};

/// Scheme the line formatter colors level tags with unless configured
/// otherwise. Differs from [`DEFAULT_COLOR_SCHEME`] only in `info`.
pub const LEVEL_COLOR_SCHEME: ColorScheme = ColorScheme {
    info: Cow::Borrowed("white"),
    warn: Cow::Borrowed("yellow"),
    error: Cow::Borrowed("red"),
    fatal: Cow::Borrowed("red"),
    panic: Cow::Borrowed("red"),
    debug: Cow::Borrowed("blue"),
    prefix: Cow::Borrowed("cyan"),
    timestamp: Cow::Borrowed("black+h"),
};

impl ColorScheme {
    /// Style name stored in `slot`.
    pub fn style(&self, slot: StyleSlot) -> &str {
        match slot {
            StyleSlot::Info => &self.info,
            StyleSlot::Warn => &self.warn,
            StyleSlot::Error => &self.error,
            StyleSlot::Fatal => &self.fatal,
            StyleSlot::Panic => &self.panic,
            StyleSlot::Debug => &self.debug,
            StyleSlot::Prefix => &self.prefix,
            StyleSlot::Timestamp => &self.timestamp,
        }
    }

    fn style_mut(&mut self, slot: StyleSlot) -> &mut Cow<'static, str> {
        match slot {
            StyleSlot::Info => &mut self.info,
            StyleSlot::Warn => &mut self.warn,
            StyleSlot::Error => &mut self.error,
            StyleSlot::Fatal => &mut self.fatal,
            StyleSlot::Panic => &mut self.panic,
            StyleSlot::Debug => &mut self.debug,
            StyleSlot::Prefix => &mut self.prefix,
            StyleSlot::Timestamp => &mut self.timestamp,
        }
    }

    /// Replace the style name in `slot`.
    pub fn set_style(&mut self, slot: StyleSlot, style: impl Into<Cow<'static, str>>) {
        *self.style_mut(slot) = style.into();
    }

    /// Builder form of [`ColorScheme::set_style`].
    pub fn with_style(mut self, slot: StyleSlot, style: impl Into<Cow<'static, str>>) -> Self {
        self.set_style(slot, style);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Attributes {
    bold: bool,
    blink: bool,
    dimmed: bool,
    reversed: bool,
    strikethrough: bool,
    underline: bool,
}

impl Attributes {
    fn is_empty(&self) -> bool {
        *self == Attributes::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Style {
    fg: Option<Color>,
    bg: Option<Color>,
    attrs: Attributes,
}

/// A compiled style: wraps text in the ANSI escapes of one style.
///
/// The identity transform ([`ColorTransform::PLAIN`]) returns its input
/// unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorTransform(Option<Style>);

impl Default for ColorTransform {
    fn default() -> Self {
        Self::PLAIN
    }
}

impl ColorTransform {
    /// Transform that leaves text untouched.
    pub const PLAIN: ColorTransform = ColorTransform(None);

    /// Parse a style name. Unknown color names yield [`ColorTransform::PLAIN`].
    pub fn parse(style: &str) -> Self {
        let style = style.trim();
        if matches!(style, "" | "off" | "reset") {
            return Self::PLAIN;
        }

        let (fg_part, bg_part) = match style.split_once(':') {
            Some((fg, bg)) => (fg, Some(bg)),
            None => (style, None),
        };

        let (fg_name, fg_flags) = split_flags(fg_part);
        let Ok(fg) = lookup_color(fg_name, fg_flags.contains('h')) else {
            return Self::PLAIN;
        };

        let bg = match bg_part {
            Some(part) => {
                let (bg_name, bg_flags) = split_flags(part);
                match lookup_color(bg_name, bg_flags.contains('h')) {
                    Ok(color) => color,
                    Err(UnknownColor) => return Self::PLAIN,
                }
            }
            None => None,
        };

        let attrs = Attributes {
            bold: fg_flags.contains('b'),
            blink: fg_flags.contains('B'),
            dimmed: fg_flags.contains('d'),
            reversed: fg_flags.contains('i'),
            strikethrough: fg_flags.contains('s'),
            underline: fg_flags.contains('u'),
        };

        if fg.is_none() && bg.is_none() && attrs.is_empty() {
            return Self::PLAIN;
        }
        ColorTransform(Some(Style { fg, bg, attrs }))
    }

    /// Whether this transform leaves text untouched.
    pub fn is_plain(&self) -> bool {
        self.0.is_none()
    }

    /// Apply the transform to `text`.
    pub fn apply(&self, text: &str) -> String {
        let Some(style) = self.0 else {
            return text.to_owned();
        };
        if text.is_empty() {
            return String::new();
        }

        let mut out = text.normal();
        if let Some(fg) = style.fg {
            out = out.color(fg);
        }
        if let Some(bg) = style.bg {
            out = out.on_color(bg);
        }
        if style.attrs.bold {
            out = out.bold();
        }
        if style.attrs.dimmed {
            out = out.dimmed();
        }
        if style.attrs.underline {
            out = out.underline();
        }
        if style.attrs.blink {
            out = out.blink();
        }
        if style.attrs.reversed {
            out = out.reversed();
        }
        if style.attrs.strikethrough {
            out = out.strikethrough();
        }
        out.to_string()
    }
}

fn split_flags(part: &str) -> (&str, &str) {
    part.split_once('+').unwrap_or((part, ""))
}

struct UnknownColor;

/// `Ok(None)` means "no color" (`default` or an empty name).
fn lookup_color(name: &str, high_intensity: bool) -> Result<Option<Color>, UnknownColor> {
    let (normal, bright) = match name {
        "" | "default" => return Ok(None),
        "black" => (Color::Black, Color::BrightBlack),
        "red" => (Color::Red, Color::BrightRed),
        "green" => (Color::Green, Color::BrightGreen),
        "yellow" => (Color::Yellow, Color::BrightYellow),
        "blue" => (Color::Blue, Color::BrightBlue),
        "magenta" => (Color::Magenta, Color::BrightMagenta),
        "cyan" => (Color::Cyan, Color::BrightCyan),
        "white" => (Color::White, Color::BrightWhite),
        _ => {
            let index: u8 = name.parse().map_err(|_| UnknownColor)?;
            return Ok(Some(palette_color(index)));
        }
    };
    Ok(Some(if high_intensity { bright } else { normal }))
}

/// Map an xterm-256 palette index onto a `colored` color.
fn palette_color(index: u8) -> Color {
    const BASIC: [Color; 16] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
        Color::BrightBlack,
        Color::BrightRed,
        Color::BrightGreen,
        Color::BrightYellow,
        Color::BrightBlue,
        Color::BrightMagenta,
        Color::BrightCyan,
        Color::BrightWhite,
    ];
    const CUBE: [u8; 6] = [0, 95, 135, 175, 215, 255];

    match index {
        0..=15 => BASIC[index as usize],
        16..=231 => {
            let i = index - 16;
            Color::TrueColor {
                r: CUBE[(i / 36) as usize],
                g: CUBE[((i / 6) % 6) as usize],
                b: CUBE[(i % 6) as usize],
            }
        }
        _ => {
            let level = 8 + 10 * (index - 232);
            Color::TrueColor {
                r: level,
                g: level,
                b: level,
            }
        }
    }
}

/// One compiled transform per slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompiledColorScheme {
    pub info: ColorTransform,
    pub warn: ColorTransform,
    pub error: ColorTransform,
    pub fatal: ColorTransform,
    pub panic: ColorTransform,
    pub debug: ColorTransform,
    pub prefix: ColorTransform,
    pub timestamp: ColorTransform,
}

impl CompiledColorScheme {
    /// Transform compiled for `slot`.
    pub fn get(&self, slot: StyleSlot) -> &ColorTransform {
        match slot {
            StyleSlot::Info => &self.info,
            StyleSlot::Warn => &self.warn,
            StyleSlot::Error => &self.error,
            StyleSlot::Fatal => &self.fatal,
            StyleSlot::Panic => &self.panic,
            StyleSlot::Debug => &self.debug,
            StyleSlot::Prefix => &self.prefix,
            StyleSlot::Timestamp => &self.timestamp,
        }
    }

    /// Transform used for the tag of `level`.
    pub fn level_color(&self, level: Level) -> &ColorTransform {
        self.get(StyleSlot::for_level(level))
    }
}

/// Compile `scheme`, falling back to [`DEFAULT_COLOR_SCHEME`] per empty slot.
pub fn compile(scheme: &ColorScheme) -> CompiledColorScheme {
    let resolve = |slot: StyleSlot| {
        let style = scheme.style(slot);
        if style.is_empty() {
            ColorTransform::parse(DEFAULT_COLOR_SCHEME.style(slot))
        } else {
            ColorTransform::parse(style)
        }
    };

    CompiledColorScheme {
        info: resolve(StyleSlot::Info),
        warn: resolve(StyleSlot::Warn),
        error: resolve(StyleSlot::Error),
        fatal: resolve(StyleSlot::Fatal),
        panic: resolve(StyleSlot::Panic),
        debug: resolve(StyleSlot::Debug),
        prefix: resolve(StyleSlot::Prefix),
        timestamp: resolve(StyleSlot::Timestamp),
    }
}
