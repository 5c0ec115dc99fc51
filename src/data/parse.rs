//! Text form of selectors, as typed on the command line.
//!
//! ```text
//! level0=B            named: level "level0" is label B
//! #1=[A,B]            named: depth 1 is A or B
//! level1=A..C         named: inclusive range; A.. and ..C leave one side open
//! B;..;[x,y]          bare: one slot per depth, outermost first
//! ```

use super::model::Label;
use super::selector::{AxisInput, ConventionalSelector, LevelKey, LevelSelector, NamedSelector};
use crate::error::{DlocError, Result};

/// Type a label the way CSV cells are typed: integer, float, bool, else string.
/// Quotes force a string; an empty cell is null.
pub fn parse_label(s: &str) -> Label {
    let s = s.trim();
    if s.is_empty() {
        return Label::Null;
    }
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return Label::String(s[1..s.len() - 1].to_string());
        }
    }
    if let Ok(i) = s.parse::<i64>() {
        return Label::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Label::Float(f);
    }
    if s == "true" || s == "false" {
        return Label::Bool(s == "true");
    }
    Label::String(s.to_string())
}

/// One level's selector: `A`, `[A,B]`, `A..B`, `A..`, `..B` or `..`.
pub fn parse_level_selector(s: &str) -> Result<LevelSelector> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DlocError::Parse("empty level selector".to_string()));
    }
    if let Some(inner) = s.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| DlocError::Parse(format!("unclosed list '{s}'")))?;
        if inner.trim().is_empty() {
            return Ok(LevelSelector::List(Vec::new()));
        }
        return Ok(LevelSelector::List(inner.split(',').map(parse_label).collect()));
    }
    if let Some((start, end)) = s.split_once("..") {
        let bound = |b: &str| (!b.trim().is_empty()).then(|| parse_label(b));
        return Ok(LevelSelector::Range {
            start: bound(start),
            end: bound(end),
        });
    }
    Ok(LevelSelector::Label(parse_label(s)))
}

/// Bare positional selector, slots separated by `;`. Empty means everything.
pub fn parse_conventional(s: &str) -> Result<ConventionalSelector> {
    if s.trim().is_empty() {
        return Ok(ConventionalSelector::everything());
    }
    let slots = s
        .split(';')
        .map(parse_level_selector)
        .collect::<Result<Vec<_>>>()?;
    Ok(ConventionalSelector::tuple(slots))
}

/// `key=selector`, where key is a level name or `#depth`.
pub fn parse_named_entry(s: &str) -> Result<(LevelKey, LevelSelector)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| DlocError::Parse(format!("expected key=selector, got '{s}'")))?;
    let key = key.trim();
    let key = match key.strip_prefix('#') {
        Some(depth) => LevelKey::Position(
            depth
                .parse()
                .map_err(|_| DlocError::Parse(format!("bad level position '{key}'")))?,
        ),
        None if key.is_empty() => {
            return Err(DlocError::Parse(format!("missing level name in '{s}'")))
        }
        None => LevelKey::Name(key.to_string()),
    };
    Ok((key, parse_level_selector(value)?))
}

/// Combine the expressions given for one axis.
///
/// All `key=selector` expressions form one named mapping; otherwise exactly one
/// bare selector is allowed. No expressions means the axis was not addressed.
pub fn parse_axis_input<S: AsRef<str>>(exprs: &[S]) -> Result<Option<AxisInput>> {
    let (named, bare): (Vec<&str>, Vec<&str>) = exprs
        .iter()
        .map(|e| e.as_ref())
        .partition(|e| e.contains('='));
    match (named.is_empty(), bare.as_slice()) {
        (true, []) => Ok(None),
        (true, [one]) => Ok(Some(AxisInput::Bare(parse_conventional(one)?))),
        (true, _) => Err(DlocError::Parse(
            "only one bare selector per axis".to_string(),
        )),
        (false, []) => {
            let mut mapping = NamedSelector::new();
            for expr in named {
                let (key, value) = parse_named_entry(expr)?;
                mapping.insert(key, value);
            }
            Ok(Some(AxisInput::Named(mapping)))
        }
        (false, _) => Err(DlocError::Parse(
            "cannot mix named and bare selectors on one axis".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_typed() {
        assert_eq!(parse_label("12"), Label::Integer(12));
        assert_eq!(parse_label("1.5"), Label::Float(1.5));
        assert_eq!(parse_label("true"), Label::Bool(true));
        assert_eq!(parse_label("'12'"), Label::String("12".to_string()));
        assert_eq!(parse_label(" A "), Label::from("A"));
        assert_eq!(parse_label(""), Label::Null);
    }

    #[test]
    fn level_selector_shapes() {
        assert_eq!(parse_level_selector("B").unwrap(), LevelSelector::label("B"));
        assert_eq!(
            parse_level_selector("[A, B]").unwrap(),
            LevelSelector::list(["A", "B"])
        );
        assert_eq!(
            parse_level_selector("A..B").unwrap(),
            LevelSelector::between("A", "B")
        );
        assert_eq!(
            parse_level_selector("..B").unwrap(),
            LevelSelector::Range {
                start: None,
                end: Some("B".into())
            }
        );
        assert!(parse_level_selector("..").unwrap().is_everything());
        assert_eq!(
            parse_level_selector("1.5..2.5").unwrap(),
            LevelSelector::between(1.5f64, 2.5f64)
        );
        assert!(parse_level_selector("[A,B").is_err());
    }

    #[test]
    fn conventional_slots_split_on_semicolons() {
        let sel = parse_conventional("..;A").unwrap();
        assert_eq!(sel.slots(), &[LevelSelector::all(), LevelSelector::label("A")]);
        assert_eq!(parse_conventional("").unwrap(), ConventionalSelector::everything());
    }

    #[test]
    fn named_entries_accept_positions() {
        assert_eq!(
            parse_named_entry("#1=[A]").unwrap(),
            (LevelKey::Position(1), LevelSelector::list(["A"]))
        );
        assert_eq!(
            parse_named_entry("level0 = B").unwrap(),
            (LevelKey::Name("level0".to_string()), LevelSelector::label("B"))
        );
        assert!(parse_named_entry("#x=A").is_err());
        assert!(parse_named_entry("=A").is_err());
    }

    #[test]
    fn axis_input_combines_named_expressions() {
        let input = parse_axis_input(&["level0=A", "level1=B"]).unwrap().unwrap();
        let AxisInput::Named(named) = input else {
            panic!("expected a named mapping");
        };
        assert_eq!(named.len(), 2);

        assert_eq!(parse_axis_input::<&str>(&[]).unwrap(), None);
        assert!(matches!(
            parse_axis_input(&["A"]).unwrap(),
            Some(AxisInput::Bare(_))
        ));
        assert!(parse_axis_input(&["A", "level0=B"]).is_err());
        assert!(parse_axis_input(&["A", "B"]).is_err());
    }
}
