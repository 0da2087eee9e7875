//! Default templates installed into a fresh data dir.
pub const PACK_MCMETA_JSON: &str = include_str!("../templates/resourcepack/pack.mcmeta");
pub const DISCS_JSON: &str = include_str!("../templates/discs.json");
pub const SOUNDS_JSON: &str =
    include_str!("../templates/resourcepack/assets/minecraft/sounds.json");
