//! 照合結果の導出木
//!
//! 導出木の実体はワーカーが保持し、[`Derivation`]と[`Word`]はワーカーへの
//! 軽量な参照です。ワーカーより長く保持する場合は[`Derivation::to_match`]で
//! 所有型の[`ParseMatch`]に変換します。

use std::ops::Range;
use std::sync::Arc;

use crate::dictionary::Features;
use crate::matcher::worker::Worker;

/// 辞書の語に一致した葉
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WordMatch {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) features: Features,
}

/// 導出木の子
#[derive(Clone, Debug)]
pub(crate) enum ChildNode {
    Word(WordMatch),
    Phrase(Arc<PhraseNode>),
}

/// 1つの記号の導出
#[derive(Clone, Debug)]
pub(crate) struct PhraseNode {
    pub(crate) name: Arc<str>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) attributes: Features,
    pub(crate) children: Vec<ChildNode>,
}

impl Drop for PhraseNode {
    fn drop(&mut self) {
        // Nested phrases are released one by one instead of recursively.
        let mut stack = vec![];
        take_phrases(&mut self.children, &mut stack);
        while let Some(node) = stack.pop() {
            if let Some(mut node) = Arc::into_inner(node) {
                take_phrases(&mut node.children, &mut stack);
            }
        }
    }
}

fn take_phrases(children: &mut Vec<ChildNode>, stack: &mut Vec<Arc<PhraseNode>>) {
    stack.extend(children.drain(..).filter_map(|c| match c {
        ChildNode::Phrase(p) => Some(p),
        ChildNode::Word(_) => None,
    }));
}

/// 照合結果の導出
///
/// このオブジェクトは[`Worker`]への軽量な参照であり、ワーカーが次の文で
/// リセットされるまで有効です。
pub struct Derivation<'w> {
    worker: &'w Worker,
    node: &'w PhraseNode,
}

impl<'w> Derivation<'w> {
    #[inline(always)]
    pub(crate) const fn new(worker: &'w Worker, node: &'w PhraseNode) -> Self {
        Self { worker, node }
    }

    /// 導出された記号の名前を返します。
    #[inline(always)]
    pub fn name(&self) -> &'w str {
        &self.node.name
    }

    /// 導出が覆う範囲を、正規化後の文字位置で返します。
    #[inline(always)]
    pub fn range_char(&self) -> Range<usize> {
        self.node.start..self.node.end
    }

    /// 導出が覆う範囲を、元の入力のバイト位置で返します。
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        let sent = &self.worker.sent;
        sent.byte_position(self.node.start)..sent.byte_position(self.node.end)
    }

    /// 導出が覆う元の入力の部分文字列を返します。
    #[inline(always)]
    pub fn surface(&self) -> &'w str {
        &self.worker.sent.raw()[self.range_byte()]
    }

    /// 呼び出し元に公開された属性を返します。
    #[inline(always)]
    pub fn attributes(&self) -> Features {
        self.node.attributes
    }

    /// 子の数を返します。
    #[inline(always)]
    pub fn num_children(&self) -> usize {
        self.node.children.len()
    }

    /// 子を入力の順に列挙します。
    pub fn children(&self) -> impl Iterator<Item = Child<'w>> + use<'w> {
        let (worker, node) = (self.worker, self.node);
        node.children.iter().map(move |c| match c {
            ChildNode::Word(m) => Child::Word(Word { worker, m }),
            ChildNode::Phrase(p) => Child::Phrase(Derivation::new(worker, p)),
        })
    }

    /// 所有型の[`ParseMatch`]に変換します。
    pub fn to_match(&self) -> ParseMatch {
        ParseMatch {
            name: Some(self.name().to_string()),
            text: self.surface().to_string(),
            range_char: self.range_char(),
            range_byte: self.range_byte(),
            attributes: self.attributes(),
            children: self
                .children()
                .map(|c| match c {
                    Child::Word(w) => w.to_match(),
                    Child::Phrase(d) => d.to_match(),
                })
                .collect(),
        }
    }
}

impl std::fmt::Debug for Derivation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Derivation")
            .field("name", &self.name())
            .field("surface", &self.surface())
            .field("range_char", &self.range_char())
            .field("range_byte", &self.range_byte())
            .field("attributes", &self.attributes())
            .finish()
    }
}

/// 導出木の子
#[derive(Debug)]
pub enum Child<'w> {
    /// 辞書の語
    Word(Word<'w>),
    /// 非終端記号の導出
    Phrase(Derivation<'w>),
}

/// 辞書の語に一致した葉
pub struct Word<'w> {
    worker: &'w Worker,
    m: &'w WordMatch,
}

impl<'w> Word<'w> {
    #[inline(always)]
    pub fn range_char(&self) -> Range<usize> {
        self.m.start..self.m.end
    }

    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        let sent = &self.worker.sent;
        sent.byte_position(self.m.start)..sent.byte_position(self.m.end)
    }

    #[inline(always)]
    pub fn surface(&self) -> &'w str {
        &self.worker.sent.raw()[self.range_byte()]
    }

    /// 一致した辞書の読みの属性を返します。
    #[inline(always)]
    pub fn features(&self) -> Features {
        self.m.features
    }

    pub fn to_match(&self) -> ParseMatch {
        ParseMatch {
            name: None,
            text: self.surface().to_string(),
            range_char: self.range_char(),
            range_byte: self.range_byte(),
            attributes: self.features(),
            children: vec![],
        }
    }
}

impl std::fmt::Debug for Word<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Word")
            .field("surface", &self.surface())
            .field("range_char", &self.range_char())
            .field("features", &self.features())
            .finish()
    }
}

/// 所有型の導出木
///
/// ワーカーから独立しているため、スレッド間で送ったり保存したりできます。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseMatch {
    /// 記号の名前。辞書の語の葉では`None`。
    pub name: Option<String>,
    /// 元の入力の部分文字列
    pub text: String,
    pub range_char: Range<usize>,
    pub range_byte: Range<usize>,
    /// 公開された属性。辞書の語の葉では読みの属性。
    pub attributes: Features,
    pub children: Vec<ParseMatch>,
}
