//! Bit-flag codec for the `aurafilter` column of Skills.txt
//!
//! The column is a 32-bit flag field; the structured format spells the
//! known bits out as names so hand edits stay readable. Unknown bits
//! are carried alongside as a raw integer so the value survives the
//! round trip untouched.

/// Known aurafilter bits, in bit order.
/// See https://d2mods.info/forum/viewtopic.php?t=43737
pub const AURAFILTER_FLAGS: &[(&str, u32)] = &[
    ("FindPlayers", 0x0000_0001),
    ("FindMonsters", 0x0000_0002),
    ("FindOnlyUndead", 0x0000_0004),
    // Ignores missiles with explosion=1 in missiles.txt
    ("FindMissiles", 0x0000_0008),
    ("FindObjects", 0x0000_0010),
    ("FindItems", 0x0000_0020),
    // Target units flagged as IsAtt in monstats2.txt
    ("FindAttackable", 0x0000_0080),
    ("NotInsideTowns", 0x0000_0100),
    ("UseLineOfSight", 0x0000_0200),
    // Checked manually by curse skill functions
    ("FindSelectable", 0x0000_0400),
    // Targets corpses of monsters and players
    ("FindCorpses", 0x0000_1000),
    ("NotInsideTowns2", 0x0000_2000),
    // Ignores units with SetBoss=1 in MonStats.txt
    ("IgnoreBoss", 0x0000_4000),
    ("IgnoreAllies", 0x0000_8000),
    // Ignores units with npc=1 in MonStats.txt
    ("IgnoreNPC", 0x0001_0000),
    // Ignores units with primeevil=1 in MonStats.txt
    ("IgnorePrimeEvil", 0x0004_0000),
    ("IgnoreJustHitUnits", 0x0008_0000), // Used by chainlightning
    // Rest are unknown
];

/// Decode an aurafilter value into `(known flag names, unknown bits)`
pub fn decode_aurafilter(mut value: u32) -> (Vec<&'static str>, u32) {
    let mut names = Vec::new();
    for &(name, flag) in AURAFILTER_FLAGS {
        if value & flag != 0 {
            value &= !flag;
            names.push(name);
        }
    }
    (names, value)
}

/// Combine flag names (plus any unknown bits) back into the value.
/// Fails with the offending name when a flag is not recognized.
pub fn encode_aurafilter<S: AsRef<str>>(names: &[S], unknown_bits: u32) -> Result<u32, String> {
    let mut value = unknown_bits;
    for name in names {
        let name = name.as_ref();
        match AURAFILTER_FLAGS.iter().find(|(n, _)| *n == name) {
            Some((_, flag)) => value |= flag,
            None => return Err(name.to_string()),
        }
    }
    Ok(value)
}
