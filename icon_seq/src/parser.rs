//! Reads back the declarations this crate writes.
//!
//! Anything that is not one of our declarations is skipped, so hand-written code around the
//! generated blocks does not get in the way.
use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{
        alpha1, alphanumeric1, char, hex_digit1, multispace0, multispace1, u16 as parse_u16,
    },
    combinator::{map, map_res, opt, recognize},
    multi::{many0, many0_count},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult as _IResult,
};

use crate::{error::IconSeqError, ParsedHeader, ParsedIcon};

pub type IResult<'a, T> = _IResult<&'a str, T>;

struct SequenceDecl<'a> {
    name: &'a str,
    bitmaps: &'a str,
    width: u16,
    height: u16,
    frame_count: u16,
}

enum Decl<'a> {
    Typedef,
    Bitmaps(&'a str, Vec<u16>),
    Sequence(SequenceDecl<'a>),
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<'a, O>,
) -> impl FnMut(&'a str) -> IResult<'a, O> {
    delimited(multispace0, inner, multispace0)
}

fn identifier(i: &str) -> IResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(i)
}

fn hex_word(i: &str) -> IResult<'_, u16> {
    map_res(
        preceded(alt((tag("0x"), tag("0X"))), hex_digit1),
        |digits: &str| u16::from_str_radix(digits, 16),
    )(i)
}

// static const <type> [PROGMEM]
fn declaration_prefix<'a>(type_name: &'static str) -> impl FnMut(&'a str) -> IResult<'a, ()> {
    map(
        tuple((
            tag("static"),
            multispace1,
            tag("const"),
            multispace1,
            tag(type_name),
            multispace1,
            opt(pair(tag("PROGMEM"), multispace1)),
        )),
        |_| (),
    )
}

fn typedef_decl(i: &str) -> IResult<'_, ()> {
    map(
        tuple((
            tag("typedef"),
            multispace1,
            tag("struct"),
            ws(char('{')),
            take_until("}"),
            char('}'),
            ws(tag("IconSequence")),
            char(';'),
        )),
        |_| (),
    )(i)
}

fn bitmaps_decl(i: &str) -> IResult<'_, (&str, Vec<u16>)> {
    let (i, _) = declaration_prefix("uint16_t")(i)?;
    let (i, name) = identifier(i)?;
    let (i, _) = tuple((ws(tag("[]")), char('='), ws(char('{'))))(i)?;
    let (i, mut values) = many0(terminated(hex_word, ws(char(','))))(i)?;
    // last element without a trailing comma
    let (i, last) = opt(hex_word)(i)?;
    let (i, _) = tuple((ws(char('}')), char(';')))(i)?;

    values.extend(last);

    Ok((i, (name, values)))
}

fn sequence_decl(i: &str) -> IResult<'_, SequenceDecl<'_>> {
    let (i, _) = declaration_prefix("IconSequence")(i)?;
    let (i, name) = identifier(i)?;
    let (i, _) = tuple((
        ws(char('=')),
        char('{'),
        ws(char('(')),
        tag("uint16_t"),
        ws(char('*')),
        char(')'),
        multispace0,
    ))(i)?;
    let (i, bitmaps) = identifier(i)?;
    let (i, width) = preceded(ws(char(',')), parse_u16)(i)?;
    let (i, height) = preceded(ws(char(',')), parse_u16)(i)?;
    let (i, frame_count) = preceded(ws(char(',')), parse_u16)(i)?;
    let (i, _) = tuple((ws(char('}')), char(';')))(i)?;

    Ok((
        i,
        SequenceDecl {
            name,
            bitmaps,
            width,
            height,
            frame_count,
        },
    ))
}

fn decl(i: &str) -> IResult<'_, Decl<'_>> {
    alt((
        map(typedef_decl, |_| Decl::Typedef),
        map(bitmaps_decl, |(name, values)| Decl::Bitmaps(name, values)),
        map(sequence_decl, Decl::Sequence),
    ))(i)
}

fn scan(text: &str) -> Vec<Decl<'_>> {
    let mut res = vec![];
    let mut rest = text;

    while !rest.is_empty() {
        if let Ok((i, found)) = decl(rest) {
            res.push(found);
            rest = i;
            continue;
        }

        let mut chars = rest.chars();
        chars.next();
        rest = chars.as_str();
    }

    res
}

/// Whether `text` already has the `IconSequence` typedef.
pub fn declares_icon_sequence(text: &str) -> bool {
    scan(text).iter().any(|decl| matches!(decl, Decl::Typedef))
}

/// Collects every icon declared in `text`, in declaration order.
///
/// A descriptor pointing at an array that was never declared is an error.
pub fn parse_header(text: &str) -> Result<ParsedHeader, IconSeqError> {
    let mut header = ParsedHeader::default();
    let mut arrays: HashMap<&str, Vec<u16>> = HashMap::new();

    for decl in scan(text) {
        match decl {
            Decl::Typedef => header.declares_type = true,
            Decl::Bitmaps(name, values) => {
                arrays.insert(name, values);
            }
            Decl::Sequence(seq) => {
                let Some(pixels) = arrays.remove(seq.bitmaps) else {
                    return IconSeqError::Parse {
                        message: format!(
                            "`{}` points at undeclared array `{}`",
                            seq.name, seq.bitmaps
                        ),
                    }
                    .to_result();
                };

                let symbol = seq.name.strip_prefix("icon_").unwrap_or(seq.name);

                header.icons.push(ParsedIcon {
                    symbol: symbol.to_string(),
                    pixels,
                    width: seq.width,
                    height: seq.height,
                    frame_count: seq.frame_count,
                });
            }
        }
    }

    Ok(header)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex_words() {
        assert_eq!(hex_word("0x00F8, ").unwrap(), (", ", 0x00F8));
        assert_eq!(hex_word("0xffff").unwrap(), ("", 0xFFFF));
        assert!(hex_word("F800").is_err());
    }

    #[test]
    fn typedef_with_odd_spacing() {
        let text = "typedef struct{ uint16_t *frames; uint16_t count; }IconSequence;";
        assert!(declares_icon_sequence(text));
        assert!(!declares_icon_sequence("typedef struct { int a; } Other;"));
    }

    #[test]
    fn array_without_trailing_comma() {
        let (_, (name, values)) =
            bitmaps_decl("static const uint16_t icon_a_bitmaps[] = { 0x0001, 0x0002 };").unwrap();

        assert_eq!(name, "icon_a_bitmaps");
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn empty_array() {
        let (_, (_, values)) =
            bitmaps_decl("static const uint16_t PROGMEM icon_a_bitmaps[] = { };").unwrap();

        assert!(values.is_empty());
    }

    #[test]
    fn skips_unrelated_code() {
        let text = "\
#pragma once
// some notes
static const uint16_t PROGMEM icon_coin_bitmaps[] = { 0x0000, 0x1F00, };
int unrelated = 3;
static const IconSequence PROGMEM icon_coin = { (uint16_t *) icon_coin_bitmaps, 2, 1, 1 };
";
        let header = parse_header(text).unwrap();

        assert!(!header.declares_type);
        assert_eq!(
            header.icons,
            vec![ParsedIcon {
                symbol: "coin".to_string(),
                pixels: vec![0x0000, 0x1F00],
                width: 2,
                height: 1,
                frame_count: 1,
            }]
        );
    }

    #[test]
    fn dangling_descriptor() {
        let text =
            "static const IconSequence PROGMEM icon_x = { (uint16_t *) icon_x_bitmaps, 1, 1, 1 };";

        assert!(matches!(
            parse_header(text),
            Err(IconSeqError::Parse { .. })
        ));
    }
}
