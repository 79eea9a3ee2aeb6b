//! Resource type tags and their file extensions

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceTypeError {
    #[error("unknown resource extension {0:?}")]
    UnknownExtension(String),

    #[error("unknown resource type tag {0:#06x}")]
    UnknownTag(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceType {
    Bmp,
    Mve,
    Wav,
    Wfx,
    Plt,
    Bam,
    Wed,
    Chu,
    Tis,
    Mos,
    Itm,
    Spl,
    Bcs,
    Ids,
    Cre,
    Are,
    Dlg,
    /// Tabular data, "2da"
    Tda,
    Gam,
    Sto,
    Wmp,
    Eff,
    Bs,
    Chr,
    Vvc,
    Vef,
    Pro,
    Bio,
    Wbm,
    Fnt,
    Gui,
    Sql,
    Pvrz,
    Glsl,
    Menu,
    Lua,
    Ttf,
    Png,
    Bah,
    Ini,
    Src,
}

/// (type, tag, extension)
const TABLE: [(ResourceType, u16, &str); 41] = {
    use ResourceType::*;
    [
        (Bmp, 0x0001, "bmp"),
        (Mve, 0x0002, "mve"),
        (Wav, 0x0004, "wav"),
        (Wfx, 0x0005, "wfx"),
        (Plt, 0x0006, "plt"),
        (Bam, 0x03e8, "bam"),
        (Wed, 0x03e9, "wed"),
        (Chu, 0x03ea, "chu"),
        (Tis, 0x03eb, "tis"),
        (Mos, 0x03ec, "mos"),
        (Itm, 0x03ed, "itm"),
        (Spl, 0x03ee, "spl"),
        (Bcs, 0x03ef, "bcs"),
        (Ids, 0x03f0, "ids"),
        (Cre, 0x03f1, "cre"),
        (Are, 0x03f2, "are"),
        (Dlg, 0x03f3, "dlg"),
        (Tda, 0x03f4, "2da"),
        (Gam, 0x03f5, "gam"),
        (Sto, 0x03f6, "sto"),
        (Wmp, 0x03f7, "wmp"),
        (Eff, 0x03f8, "eff"),
        (Bs, 0x03f9, "bs"),
        (Chr, 0x03fa, "chr"),
        (Vvc, 0x03fb, "vvc"),
        (Vef, 0x03fc, "vef"),
        (Pro, 0x03fd, "pro"),
        (Bio, 0x03fe, "bio"),
        (Wbm, 0x03ff, "wbm"),
        (Fnt, 0x0400, "fnt"),
        (Gui, 0x0402, "gui"),
        (Sql, 0x0403, "sql"),
        (Pvrz, 0x0404, "pvrz"),
        (Glsl, 0x0405, "glsl"),
        (Menu, 0x0408, "menu"),
        (Lua, 0x0409, "lua"),
        (Ttf, 0x040a, "ttf"),
        (Png, 0x040b, "png"),
        (Bah, 0x044c, "bah"),
        (Ini, 0x0802, "ini"),
        (Src, 0x0803, "src"),
    ]
};

impl ResourceType {
    pub fn all() -> impl Iterator<Item = ResourceType> {
        TABLE.iter().map(|(ty, _, _)| *ty)
    }

    fn row(self) -> &'static (ResourceType, u16, &'static str) {
        TABLE
            .iter()
            .find(|(ty, _, _)| *ty == self)
            .unwrap_or_else(|| unreachable!("every variant has a table row"))
    }

    pub fn tag(self) -> u16 {
        self.row().1
    }

    pub fn extension(self) -> &'static str {
        self.row().2
    }

    pub fn from_tag(tag: u16) -> Result<Self, ResourceTypeError> {
        TABLE
            .iter()
            .find(|(_, t, _)| *t == tag)
            .map(|(ty, _, _)| *ty)
            .ok_or(ResourceTypeError::UnknownTag(tag))
    }

    /// Case-insensitive, without the leading dot
    pub fn from_extension(extension: &str) -> Result<Self, ResourceTypeError> {
        TABLE
            .iter()
            .find(|(_, _, ext)| ext.eq_ignore_ascii_case(extension))
            .map(|(ty, _, _)| *ty)
            .ok_or_else(|| ResourceTypeError::UnknownExtension(extension.to_string()))
    }
}

impl std::str::FromStr for ResourceType {
    type Err = ResourceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}
