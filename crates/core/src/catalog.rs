// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Optimization pass-list catalog.
//!
//! The fixed pass sequences behind the standard `O0`..`O3` levels, captured
//! once as constants and never mutated at runtime. Tokens may repeat within a
//! sequence; repetition is meaningful to the optimizer and is preserved as-is.

/// Pass sequence behind the `O0` level.
pub const O0_PASSES: &[&str] = &[
    "-ee-instrument", "-forceattrs", "-always-inline",
];

/// Pass sequence behind the `O1` level.
pub const O1_PASSES: &[&str] = &[
    "-ee-instrument", "-simplifycfg", "-sroa", "-early-cse", "-lower-expect", "-forceattrs",
    "-inferattrs", "-ipsccp", "-called-value-propagation", "-globalopt", "-mem2reg", "-deadargelim",
    "-instcombine", "-simplifycfg", "-globals-aa", "-prune-eh", "-always-inline", "-functionattrs",
    "-sroa", "-early-cse-memssa", "-speculative-execution", "-jump-threading",
    "-correlated-propagation", "-simplifycfg", "-instcombine", "-libcalls-shrinkwrap",
    "-pgo-memop-opt", "-tailcallelim", "-simplifycfg", "-reassociate", "-loop-simplify",
    "-loop-rotate", "-licm", "-loop-unswitch", "-simplifycfg", "-instcombine", "-indvars",
    "-loop-idiom", "-loop-deletion", "-loop-unroll", "-memcpyopt", "-sccp", "-bdce", "-instcombine",
    "-jump-threading", "-correlated-propagation", "-dse", "-licm", "-adce", "-simplifycfg",
    "-instcombine", "-barrier", "-rpo-functionattrs", "-globalopt", "-globaldce", "-globals-aa",
    "-float2int", "-loop-rotate", "-loop-distribute", "-loop-vectorize", "-loop-load-elim",
    "-instcombine", "-simplifycfg", "-loop-unroll", "-instcombine", "-licm",
    "-alignment-from-assumptions", "-strip-dead-prototypes", "-loop-sink", "-instsimplify",
    "-div-rem-pairs", "-simplifycfg",
];

/// Pass sequence behind the `O2` level.
pub const O2_PASSES: &[&str] = &[
    "-ee-instrument", "-simplifycfg", "-sroa", "-early-cse", "-lower-expect", "-forceattrs",
    "-inferattrs", "-ipsccp", "-called-value-propagation", "-globalopt", "-mem2reg", "-deadargelim",
    "-instcombine", "-simplifycfg", "-globals-aa", "-prune-eh", "-inline", "-functionattrs",
    "-sroa", "-early-cse-memssa", "-speculative-execution", "-jump-threading",
    "-correlated-propagation", "-simplifycfg", "-instcombine", "-libcalls-shrinkwrap",
    "-pgo-memop-opt", "-tailcallelim", "-simplifycfg", "-reassociate", "-loop-simplify",
    "-loop-rotate", "-licm", "-loop-unswitch", "-simplifycfg", "-instcombine", "-indvars",
    "-loop-idiom", "-loop-deletion", "-loop-unroll", "-mldst-motion", "-gvn", "-memcpyopt", "-sccp",
    "-bdce", "-instcombine", "-jump-threading", "-correlated-propagation", "-dse", "-licm", "-adce",
    "-simplifycfg", "-instcombine", "-barrier", "-elim-avail-extern", "-rpo-functionattrs",
    "-globalopt", "-globaldce", "-globals-aa", "-float2int", "-loop-rotate", "-loop-distribute",
    "-loop-vectorize", "-loop-load-elim", "-instcombine", "-simplifycfg", "-slp-vectorizer",
    "-instcombine", "-loop-unroll", "-instcombine", "-licm", "-alignment-from-assumptions",
    "-strip-dead-prototypes", "-globaldce", "-constmerge", "-loop-sink", "-instsimplify",
    "-div-rem-pairs", "-simplifycfg",
];

/// Pass sequence behind the `O3` level (the most aggressive defined level).
pub const O3_PASSES: &[&str] = &[
    "-ee-instrument", "-simplifycfg", "-sroa", "-early-cse", "-lower-expect", "-forceattrs",
    "-inferattrs", "-callsite-splitting", "-ipsccp", "-called-value-propagation", "-globalopt",
    "-mem2reg", "-deadargelim", "-instcombine", "-simplifycfg", "-globals-aa", "-prune-eh",
    "-inline", "-functionattrs", "-argpromotion", "-sroa", "-early-cse-memssa",
    "-speculative-execution", "-jump-threading", "-correlated-propagation", "-simplifycfg",
    "-aggressive-instcombine", "-instcombine", "-libcalls-shrinkwrap", "-pgo-memop-opt",
    "-tailcallelim", "-simplifycfg", "-reassociate", "-loop-simplify", "-loop-rotate", "-licm",
    "-loop-unswitch", "-simplifycfg", "-instcombine", "-indvars", "-loop-idiom", "-loop-deletion",
    "-loop-unroll", "-mldst-motion", "-gvn", "-memcpyopt", "-sccp", "-bdce", "-instcombine",
    "-jump-threading", "-correlated-propagation", "-dse", "-licm", "-adce", "-simplifycfg",
    "-instcombine", "-barrier", "-elim-avail-extern", "-rpo-functionattrs", "-globalopt",
    "-globaldce", "-globals-aa", "-float2int", "-loop-rotate", "-loop-distribute",
    "-loop-vectorize", "-loop-load-elim", "-instcombine", "-simplifycfg", "-slp-vectorizer",
    "-instcombine", "-loop-unroll", "-instcombine", "-licm", "-alignment-from-assumptions",
    "-strip-dead-prototypes", "-globaldce", "-constmerge", "-loop-sink", "-instsimplify",
    "-div-rem-pairs", "-simplifycfg",
];

/// The fixed baseline levels, in the order their columns appear in the result
/// matrix. This order never changes between runs.
pub const BASELINE_LEVELS: [BaselineLevel; 7] = [
    BaselineLevel::None,
    BaselineLevel::O0,
    BaselineLevel::O1,
    BaselineLevel::O2,
    BaselineLevel::O3,
    BaselineLevel::Os,
    BaselineLevel::Oz,
];

/// A standard optimization preset measured as a reference point, distinct from
/// the swept pass sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaselineLevel {
    /// No optimization flags at all.
    None,
    O0,
    O1,
    O2,
    O3,
    Os,
    Oz,
}

impl BaselineLevel {
    /// The command-line flag handed to the optimizer stage, if any.
    pub fn flag(self) -> Option<&'static str> {
        match self {
            BaselineLevel::None => None,
            BaselineLevel::O0 => Some("-O0"),
            BaselineLevel::O1 => Some("-O1"),
            BaselineLevel::O2 => Some("-O2"),
            BaselineLevel::O3 => Some("-O3"),
            BaselineLevel::Os => Some("-Os"),
            BaselineLevel::Oz => Some("-Oz"),
        }
    }

    /// The level name used in result column headers.
    pub fn label(self) -> &'static str {
        match self {
            BaselineLevel::None => "None",
            BaselineLevel::O0 => "O0",
            BaselineLevel::O1 => "O1",
            BaselineLevel::O2 => "O2",
            BaselineLevel::O3 => "O3",
            BaselineLevel::Os => "Os",
            BaselineLevel::Oz => "Oz",
        }
    }
}

/// Looks up the pass sequence for a level name.
///
/// Unknown names fall back to `O3`; the sweep always has a defined base
/// sequence even when the requested level does not exist.
pub fn sequence_for_level(name: &str) -> &'static [&'static str] {
    match name {
        "O0" => O0_PASSES,
        "O1" => O1_PASSES,
        "O2" => O2_PASSES,
        "O3" => O3_PASSES,
        _ => O3_PASSES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("O0", 3)]
    #[test_case("O1", 72)]
    #[test_case("O2", 79)]
    #[test_case("O3", 82)]
    fn sequence_lengths(name: &str, len: usize) {
        assert_eq!(sequence_for_level(name).len(), len);
    }

    #[test]
    fn unknown_level_falls_back_to_o3() {
        assert_eq!(sequence_for_level("Ofoo"), O3_PASSES);
        assert_eq!(sequence_for_level(""), O3_PASSES);
    }

    #[test]
    fn baseline_levels_keep_their_fixed_order() {
        let flags: Vec<_> = BASELINE_LEVELS.iter().map(|l| l.flag()).collect();
        assert_eq!(
            flags,
            vec![None, Some("-O0"), Some("-O1"), Some("-O2"), Some("-O3"), Some("-Os"), Some("-Oz")]
        );
    }

    #[test]
    fn repeated_tokens_are_preserved() {
        let repeats = O1_PASSES.iter().filter(|p| **p == "-simplifycfg").count();
        assert!(repeats > 1, "duplicate pass tokens must not be collapsed");
    }
}