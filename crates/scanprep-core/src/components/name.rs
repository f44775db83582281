use serde::{Deserialize, Serialize};

/// Nameコンポーネント
/// オブジェクトの表示名を表す
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name {
    value: String,
}

impl Name {
    /// 新しいNameコンポーネントを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }

    /// 名前を文字列スライスとして取得
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// 接尾辞を付けた新しい名前を作成（例: "Scan" -> "Scan_LowPoly"）
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self::new(format!("{}{}", self.value, suffix))
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::new("Object")
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
