//! 形態素属性の定義
//!
//! 品詞(`pos`)、数(`number`)、格(`case`)の3種類の属性を、
//! それぞれ閉じた列挙型として表現します。辞書ファイル中では各属性は
//! 1始まりのインデックス(0は属性なし)として格納されます。

use std::fmt;
use std::str::FromStr;

macro_rules! define_tagset {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            /// 定義順に並んだすべての値
            pub const ALL: &'static [Self] = &[$( Self::$variant, )*];

            /// 辞書タグ表記を返します。
            #[inline(always)]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $tag, )*
                }
            }

            /// 小文字の辞書タグから値を取得します。
            ///
            /// 未知のタグの場合は`None`を返します。
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( $tag => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// 辞書ファイル上の1始まりのコードを返します。
            #[inline(always)]
            pub(crate) const fn code(self) -> u8 {
                self as u8 + 1
            }

            /// 1始まりのコードから値を復元します。
            ///
            /// 範囲外のコード(0を含む)に対しては`None`を返します。
            #[inline(always)]
            pub(crate) fn from_code(code: u8) -> Option<Self> {
                Self::ALL.get(usize::from(code).checked_sub(1)?).copied()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_tag(s).ok_or(concat!("Could not parse ", stringify!($name)))
            }
        }
    };
}

define_tagset! {
    /// 品詞
    PartOfSpeech {
        /// 名詞
        Noun => "noun",
        /// 副詞
        Advb => "advb",
        /// 形容詞(長語尾形)
        Adjf => "adjf",
        /// 形容詞(短語尾形)
        Adjs => "adjs",
        /// 比較級
        Comp => "comp",
        /// 動詞(人称形)
        Verb => "verb",
        /// 不定詞
        Infn => "infn",
        /// 形動詞(長語尾形)
        Prtf => "prtf",
        /// 形動詞(短語尾形)
        Prts => "prts",
        /// 副動詞
        Grnd => "grnd",
        /// 接続詞
        Conj => "conj",
        /// 間投詞
        Intj => "intj",
        /// 助詞
        Prcl => "prcl",
        /// 前置詞
        Prep => "prep",
        /// 述語副詞
        Pred => "pred",
        /// 数詞
        Numr => "numr",
        /// 代名詞
        Npro => "npro",
    }
}

define_tagset! {
    /// 数
    Number {
        /// 単数
        Sing => "sing",
        /// 複数
        Plur => "plur",
    }
}

define_tagset! {
    /// 格
    Case {
        /// 主格
        Nomn => "nomn",
        /// 生格
        Gent => "gent",
        /// 第一生格
        Gen1 => "gen1",
        /// 第二生格
        Gen2 => "gen2",
        /// 与格
        Datv => "datv",
        /// 対格
        Accs => "accs",
        /// 造格
        Ablt => "ablt",
        /// 前置格
        Loct => "loct",
        /// 第一前置格
        Loc1 => "loc1",
        /// 第二前置格
        Loc2 => "loc2",
        /// 呼格
        Voct => "voct",
    }
}

/// 属性の種類
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum AttrKind {
    /// 品詞
    Pos,
    /// 数
    Number,
    /// 格
    Case,
}

impl AttrKind {
    /// すべての属性の種類
    pub const ALL: [Self; 3] = [Self::Pos, Self::Number, Self::Case];

    /// 文法パターン中での属性名を返します。
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pos => "pos",
            Self::Number => "number",
            Self::Case => "case",
        }
    }

    /// 属性名から種類を取得します。
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pos" => Some(Self::Pos),
            "number" => Some(Self::Number),
            "case" => Some(Self::Case),
            _ => None,
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 具体的な属性値
///
/// 属性の種類と値の組です。異なる種類の値同士は決して等しくなりません。
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Feature {
    /// 品詞
    Pos(PartOfSpeech),
    /// 数
    Number(Number),
    /// 格
    Case(Case),
}

impl Feature {
    /// 属性の種類を返します。
    #[inline(always)]
    pub const fn kind(self) -> AttrKind {
        match self {
            Self::Pos(_) => AttrKind::Pos,
            Self::Number(_) => AttrKind::Number,
            Self::Case(_) => AttrKind::Case,
        }
    }

    /// 値のタグ表記を返します。
    pub const fn value_str(self) -> &'static str {
        match self {
            Self::Pos(v) => v.as_str(),
            Self::Number(v) => v.as_str(),
            Self::Case(v) => v.as_str(),
        }
    }

    /// 指定された種類の値としてタグをパースします。
    ///
    /// # 引数
    ///
    /// * `kind` - 属性の種類
    /// * `value` - 小文字のタグ
    ///
    /// # 戻り値
    ///
    /// タグがその種類の値として正しければ`Some(Feature)`
    pub fn parse(kind: AttrKind, value: &str) -> Option<Self> {
        match kind {
            AttrKind::Pos => PartOfSpeech::from_tag(value).map(Self::Pos),
            AttrKind::Number => Number::from_tag(value).map(Self::Number),
            AttrKind::Case => Case::from_tag(value).map(Self::Case),
        }
    }

    /// 種類を問わずタグを解釈します。
    ///
    /// 辞書の素性列はどの属性のタグかを明示しないため、
    /// 品詞、数、格の順に照合します。
    pub fn from_tag(tag: &str) -> Option<Self> {
        PartOfSpeech::from_tag(tag)
            .map(Self::Pos)
            .or_else(|| Number::from_tag(tag).map(Self::Number))
            .or_else(|| Case::from_tag(tag).map(Self::Case))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.kind(), self.value_str())
    }
}

/// 1つの語形が持つ属性の組
///
/// 各属性は独立に存在または欠落します。
#[derive(Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Features {
    pub pos: Option<PartOfSpeech>,
    pub number: Option<Number>,
    pub case: Option<Case>,
}

impl Features {
    /// 指定された種類の属性値を取得します。
    #[inline(always)]
    pub fn get(&self, kind: AttrKind) -> Option<Feature> {
        match kind {
            AttrKind::Pos => self.pos.map(Feature::Pos),
            AttrKind::Number => self.number.map(Feature::Number),
            AttrKind::Case => self.case.map(Feature::Case),
        }
    }

    /// 属性値を設定します。同じ種類の既存の値は上書きされます。
    pub fn set(&mut self, feature: Feature) {
        match feature {
            Feature::Pos(v) => self.pos = Some(v),
            Feature::Number(v) => self.number = Some(v),
            Feature::Case(v) => self.case = Some(v),
        }
    }

    /// 存在する属性値を`pos`、`number`、`case`の順に列挙します。
    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        AttrKind::ALL.into_iter().filter_map(|k| self.get(k))
    }

    /// 属性を1つも持たない場合に`true`を返します。
    pub const fn is_empty(&self) -> bool {
        self.pos.is_none() && self.number.is_none() && self.case.is_none()
    }

    /// 辞書素性タグの列から属性の組を作成します。
    ///
    /// 未知のタグは無視されます。
    pub fn from_tags<'a, I>(tags: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut features = Self::default();
        for tag in tags {
            if let Some(f) = Feature::from_tag(tag) {
                features.set(f);
            }
        }
        features
    }

    #[inline(always)]
    pub(crate) fn codes(&self) -> [u8; 3] {
        [
            self.pos.map_or(0, PartOfSpeech::code),
            self.number.map_or(0, Number::code),
            self.case.map_or(0, Case::code),
        ]
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for feature in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(feature.value_str())?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_one_based() {
        assert_eq!(PartOfSpeech::Noun.code(), 1);
        assert_eq!(PartOfSpeech::Npro.code(), 17);
        assert_eq!(Number::Plur.code(), 2);
        assert_eq!(Case::Voct.code(), 11);
        assert_eq!(Case::from_code(0), None);
        assert_eq!(Case::from_code(12), None);
        assert_eq!(Case::from_code(6), Some(Case::Accs));
    }

    #[test]
    fn test_from_tags_ignores_unknown() {
        let f = Features::from_tags(["noun", "anim", "masc", "sing", "nomn"]);
        assert_eq!(f.pos, Some(PartOfSpeech::Noun));
        assert_eq!(f.number, Some(Number::Sing));
        assert_eq!(f.case, Some(Case::Nomn));
        assert_eq!(f.to_string(), "noun,sing,nomn");
    }

    #[test]
    fn test_parse_checks_kind() {
        assert_eq!(
            Feature::parse(AttrKind::Case, "loct"),
            Some(Feature::Case(Case::Loct))
        );
        assert_eq!(Feature::parse(AttrKind::Number, "loct"), None);
    }
}
