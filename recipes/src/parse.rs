// Copyright 2021 Jeremy Wall
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::str::FromStr;

use abortable_parser::{
    ascii_digit, consume_all, do_each, either, make_fn, not, peek, text_token, trap, Error,
    Offsetable, Result, StrIter,
};
use num_rational::Ratio;

use crate::{
    unit::{Quantity, Unit},
    IngredientLine,
};

type MaybeRatio = Option<Ratio<u32>>;
type MaybeQuantity = Option<Quantity>;

/// Parse a free text ingredient line from a recipe provider. This never
/// fails. Anything we can't make sense of ends up as the ingredient text.
pub fn as_ingredient_line(i: &str) -> IngredientLine {
    let normalized = normalize_line(i);
    // Every token is followed by whitespace and the input never ends inside
    // a number.
    let padded = format!("{} \n", normalized);
    let (count, rest) = match quantity(StrIter::new(&padded)) {
        Result::Complete(rest, Some(qty)) => (Some(qty), &padded[rest.get_offset()..]),
        _ => (None, normalized.as_str()),
    };
    let rest = rest.trim();
    let mut parts = rest.splitn(2, ' ');
    match parts.next().and_then(Unit::parse) {
        Some(unit) => IngredientLine::new(
            count,
            Some(unit),
            parts.next().unwrap_or("").trim(),
        ),
        None => IngredientLine::new(count, None, rest),
    }
}

/// Parse every line of an ingredients list in order.
pub fn as_ingredient_lines<'a, Iter>(lines: Iter) -> Vec<IngredientLine>
where
    Iter: IntoIterator<Item = &'a str>,
{
    lines.into_iter().map(as_ingredient_line).collect()
}

fn vulgar_fraction(c: char) -> Option<&'static str> {
    Some(match c {
        '½' => "1/2",
        '⅓' => "1/3",
        '⅔' => "2/3",
        '¼' => "1/4",
        '¾' => "3/4",
        '⅕' => "1/5",
        '⅖' => "2/5",
        '⅗' => "3/5",
        '⅘' => "4/5",
        '⅙' => "1/6",
        '⅚' => "5/6",
        '⅐' => "1/7",
        '⅛' => "1/8",
        '⅜' => "3/8",
        '⅝' => "5/8",
        '⅞' => "7/8",
        '⅑' => "1/9",
        '⅒' => "1/10",
        _ => return None,
    })
}

/// Remove balanced parenthetical notes. An unmatched bracket is kept as is.
fn strip_notes(i: &str) -> String {
    let mut out = String::with_capacity(i.len());
    let mut rest = i;
    while let Some(start) = rest.find('(') {
        let (before, from_paren) = rest.split_at(start);
        out.push_str(before);
        match matching_paren(from_paren) {
            Some(end) => {
                out.push(' ');
                rest = &from_paren[end + 1..];
            }
            None => {
                out.push_str(from_paren);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn matching_paren(i: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in i.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => (),
        }
    }
    None
}

/// Normalize the text of an ingredient line before we look for a quantity.
pub fn normalize_line(i: &str) -> String {
    let stripped = strip_notes(i);
    let chars: Vec<char> = stripped.chars().collect();
    let mut out = String::with_capacity(stripped.len());
    for (idx, c) in chars.iter().enumerate() {
        if let Some(frac) = vulgar_fraction(*c) {
            out.push(' ');
            out.push_str(frac);
            out.push(' ');
        } else if *c == '⁄' {
            out.push('/');
        } else if *c == '-' && joins_mixed_number(&chars, idx) {
            out.push(' ');
        } else {
            out.push(*c);
        }
    }
    out.split_whitespace().collect::<Vec<&str>>().join(" ")
}

// A hyphen in "1-1/2" separates the whole part from the fraction. In "2-3"
// it is a range and we leave it alone.
fn joins_mixed_number(chars: &[char], idx: usize) -> bool {
    if idx == 0 || !chars[idx - 1].is_ascii_digit() {
        return false;
    }
    let mut next = idx + 1;
    let digits_start = next;
    while next < chars.len() && chars[next].is_ascii_digit() {
        next += 1;
    }
    next > digits_start && next < chars.len() && (chars[next] == '/' || chars[next] == '⁄')
}

make_fn!(ws<StrIter<'_>, &'_ str>,
    do_each!(
        _initial => peek!(either!(
            text_token!(" "),
            text_token!("\t"),
            text_token!("\r"))),
        rest => consume_all!(either!(
            text_token!(" "),
            text_token!("\t"),
            text_token!("\r"))),
        (rest)
    )
);

make_fn!(digits<StrIter<'_>, &'_ str>,
    do_each!(
        _ => peek!(ascii_digit),
        n => consume_all!(ascii_digit),
        (n)
    )
);

make_fn!(num<StrIter, Option<u32>>,
    do_each!(
        n => digits,
        (u32::from_str(n).ok())
    )
);

make_fn!(nonzero_num<StrIter, Option<u32>>,
    do_each!(
        _ => peek!(not!(text_token!("0"))),
        n => num,
        (n)
    )
);

make_fn!(
    pub ratio<StrIter, MaybeRatio>,
    do_each!(
        numer => num,
        _ => text_token!("/"),
        denom => nonzero_num,
        (match (numer, denom) {
            (Some(numer), Some(denom)) => Some(Ratio::new(numer, denom)),
            _ => None,
        })
    )
);

fn decimal_ratio(whole: Option<u32>, fraction_digits: &str) -> MaybeRatio {
    let places = u32::try_from(fraction_digits.len()).ok()?;
    let denom = 10u32.checked_pow(places)?;
    let fraction = u32::from_str(fraction_digits).ok()?;
    let numer = whole?.checked_mul(denom)?.checked_add(fraction)?;
    Some(Ratio::new(numer, denom))
}

make_fn!(
    decimal<StrIter, MaybeRatio>,
    do_each!(
        whole => num,
        _ => text_token!("."),
        fraction => digits,
        (decimal_ratio(whole, fraction))
    )
);

make_fn!(
    leading_number<StrIter, MaybeRatio>,
    either!(
        ratio,
        decimal,
        do_each!(
            n => num,
            (n.map(Ratio::from_integer))
        )
    )
);

/// The whole part of a mixed number. `2`, `2.0` and `4/2` all count, `1.5`
/// does not.
fn whole_part(i: StrIter<'_>) -> Result<StrIter<'_>, Option<u32>> {
    match leading_number(i.clone()) {
        Result::Complete(rest, Some(r)) if r.is_integer() => {
            Result::Complete(rest, Some(r.to_integer()))
        }
        Result::Complete(_, Some(_)) => {
            Result::Fail(Error::new("not a whole number", Box::new(i)))
        }
        Result::Complete(rest, None) => Result::Complete(rest, None),
        Result::Fail(e) => Result::Fail(e),
        Result::Abort(e) => Result::Abort(e),
        Result::Incomplete(rest) => Result::Incomplete(rest),
    }
}

make_fn!(
    pub quantity<StrIter, MaybeQuantity>,
    either!(
        do_each!(
            whole => whole_part,
            _ => ws,
            frac => ratio,
            _ => ws,
            (match (whole, frac) {
                (Some(whole), Some(frac)) => {
                    Quantity::whole(whole).checked_add(&Quantity::Frac(frac))
                }
                _ => None,
            })
        ),
        do_each!(
            frac => ratio,
            _ => ws,
            (frac.map(Quantity::from))
        ),
        do_each!(
            dec => decimal,
            _ => ws,
            (dec.map(Quantity::from))
        ),
        do_each!(
            whole => num,
            _ => ws,
            (whole.map(Quantity::whole))
        )
    )
);
