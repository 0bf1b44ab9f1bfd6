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
/*!
Quantities and units for ingredient lines.

`Quantity` is an exact rational amount so that scaling a recipe up and back
down again lands on the same numbers. `Unit` is the canonical set of units
an ingredient line may carry along with the synonyms that map onto them.
*/

use std::{
    cmp::{Ordering, PartialEq, PartialOrd},
    fmt::Display,
    ops::{Add, Mul},
};

use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedMul};

/// Canonical units for an ingredient line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    /// Teaspoon.
    Tsp,
    /// Tablespoon.
    Tbsp,
    Cup,
    /// Fluid ounce.
    Floz,
    /// Milliliter.
    Ml,
    /// Liter.
    Ltr,
    Pint,
    /// Quart.
    Qrt,
    /// Gallon.
    Gal,
    /// Ounce by weight.
    Oz,
    Pound,
    /// Kilogram.
    Kg,
    /// Gram.
    Gram,
    /// Package.
    Pkg,
    /// Simple count of items.
    Cnt,
}

use Unit::*;

/// Every unit in table order.
pub const ALL_UNITS: [Unit; 15] = [
    Tsp, Tbsp, Cup, Floz, Ml, Ltr, Pint, Qrt, Gal, Oz, Pound, Kg, Gram, Pkg, Cnt,
];

impl Unit {
    /// The canonical spelling of this unit.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tsp => "tsp",
            Tbsp => "tbsp",
            Cup => "cup",
            Floz => "floz",
            Ml => "ml",
            Ltr => "ltr",
            Pint => "pint",
            Qrt => "qrt",
            Gal => "gal",
            Oz => "oz",
            Pound => "pound",
            Kg => "kg",
            Gram => "g",
            Pkg => "pkg",
            Cnt => "cnt",
        }
    }

    /// All the spellings that normalize to this unit. The canonical spelling
    /// is always one of them.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Tsp => &["tsp", "tsps", "teaspoon", "teaspoons"],
            Tbsp => &["tbsp", "tbsps", "tablespoon", "tablespoons"],
            Cup => &["cup", "cups"],
            Floz => &["floz", "fl.oz"],
            Ml => &["ml", "milliliter", "milliliters"],
            Ltr => &["l", "ltr", "liter", "liters", "litre", "litres"],
            Pint => &["pint", "pints", "pnt"],
            Qrt => &["qrt", "qrts", "quart", "quarts"],
            Gal => &["gal", "gals", "gallon", "gallons"],
            Oz => &["oz", "ounce", "ounces"],
            Pound => &["pound", "pounds", "lb", "lbs"],
            Kg => &["kg", "kilogram", "kilograms"],
            Gram => &["g", "gram", "grams"],
            Pkg => &["pkg", "package", "packages"],
            Cnt => &["cnt", "count"],
        }
    }

    /// Look up a single token in the synonym table. Case is ignored as is a
    /// single trailing period ("Tbsp." is a tablespoon).
    pub fn parse(token: &str) -> Option<Self> {
        let lowered = token.to_lowercase();
        let lowered = lowered.strip_suffix('.').unwrap_or(&lowered);
        if lowered.is_empty() {
            return None;
        }
        ALL_UNITS
            .iter()
            .find(|u| u.synonyms().iter().any(|s| *s == lowered))
            .copied()
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a Quantity for an ingredient of a recipe.
#[derive(Copy, Clone, Debug)]
pub enum Quantity {
    /// Whole or non fractional quantities of an ingredient in a recipe.
    Whole(u32),
    /// Fractional quantities of an ingredient in a recipe.
    Frac(Ratio<u32>),
}

use Quantity::{Frac, Whole};

impl Quantity {
    /// Construct a `Whole` quantity.
    pub fn whole(n: u32) -> Self {
        Whole(n)
    }

    /// Construct a Fractional quantity.
    pub fn frac(whole: u32, numer: u32, denom: u32) -> Self {
        Frac(Ratio::from_integer(whole) + Ratio::new(numer, denom))
    }

    fn as_ratio(&self) -> Ratio<u32> {
        match self {
            Whole(v) => Ratio::from_integer(*v),
            Frac(r) => *r,
        }
    }

    /// For `Frac` values if the `Quantity` is a whole number normalize the `Whole(n)` type.
    /// Otherwise leave the `Quantity` untouched.
    pub fn normalize(self) -> Self {
        if let Frac(rat) = self {
            if rat.is_integer() {
                Whole(rat.to_integer())
            } else {
                Frac(rat)
            }
        } else {
            self
        }
    }

    /// Extract out the whole and the fractional parts of a `Quantity`.
    pub fn extract_parts(self) -> (u32, Ratio<u32>) {
        match self {
            Whole(v) => (v, Ratio::new(0, 1)),
            Frac(v) => (v.to_integer(), v.fract()),
        }
    }

    /// Approximate a quantity as a float. Fractions like 1/3 lose precision.
    pub fn approx_f64(self) -> f64 {
        match self {
            Whole(v) => v as f64,
            Frac(v) => *v.numer() as f64 / *v.denom() as f64,
        }
    }

    /// Addition that reports overflow instead of panicking.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.as_ratio()
            .checked_add(&other.as_ratio())
            .map(|r| Frac(r).normalize())
    }

    /// Multiplication that reports overflow instead of panicking.
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        self.as_ratio()
            .checked_mul(&other.as_ratio())
            .map(|r| Frac(r).normalize())
    }

    /// Scale this quantity by `numer / denom`. `None` if `denom` is zero or the
    /// result does not fit.
    pub fn scale(&self, numer: u32, denom: u32) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        self.checked_mul(&Frac(Ratio::new(numer, denom)))
    }
}

impl From<Ratio<u32>> for Quantity {
    fn from(r: Ratio<u32>) -> Self {
        Quantity::Frac(r).normalize()
    }
}

impl From<u32> for Quantity {
    fn from(u: u32) -> Self {
        Quantity::Whole(u)
    }
}

macro_rules! quantity_op {
    ($trait:ident, $method:ident) => {
        impl $trait for Quantity {
            type Output = Self;

            fn $method(self, lhs: Self) -> Self::Output {
                Frac($trait::$method(self.as_ratio(), lhs.as_ratio()))
            }
        }
    };
}

quantity_op!(Add, add);
quantity_op!(Mul, mul);

impl PartialOrd for Quantity {
    fn partial_cmp(&self, lhs: &Self) -> Option<Ordering> {
        PartialOrd::partial_cmp(&self.as_ratio(), &lhs.as_ratio())
    }
}

impl PartialEq for Quantity {
    fn eq(&self, lhs: &Self) -> bool {
        PartialEq::eq(&self.as_ratio(), &lhs.as_ratio())
    }
}

impl Display for Quantity {
    fn fmt(&self, w: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.normalize() {
            Whole(v) => write!(w, "{}", v),
            Frac(_) => {
                let (whole, frac) = self.extract_parts();
                if whole == 0 {
                    write!(w, "{}/{}", frac.numer(), frac.denom())
                } else {
                    write!(w, "{} {}/{}", whole, frac.numer(), frac.denom())
                }
            }
        }
    }
}
