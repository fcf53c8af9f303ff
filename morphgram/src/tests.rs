//! morphgramのテストモジュール群
//!
//! 辞書の構築と読み込み、サンプル文法による照合、セッションの状態遷移を
//! 検証するテストを含みます。

mod matcher;
mod session;
