//! 目录数据模型
//!
//! `ScopeKey` 标识一个 (地区, 子区划) 组合，`Catalog` 是整次运行的只读输入

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// 目录键中地区与子区划之间的分隔符
pub const SCOPE_SEPARATOR: char = '-';

/// 一个待录入的 (地区代码, 子区划代码) 组合
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeKey {
    region_code: String,
    subdivision_code: String,
}

impl ScopeKey {
    pub fn new(region_code: impl Into<String>, subdivision_code: impl Into<String>) -> Self {
        Self {
            region_code: region_code.into(),
            subdivision_code: subdivision_code.into(),
        }
    }

    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    pub fn subdivision_code(&self) -> &str {
        &self.subdivision_code
    }
}

/// 目录键格式错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidScopeKey(pub String);

impl FromStr for ScopeKey {
    type Err = InvalidScopeKey;

    /// 按第一个分隔符拆分 `REGION-SUBDIVISION`；含路径分隔符的键被拒绝
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.split_once(SCOPE_SEPARATOR) {
            Some((region, subdivision))
                if !region.is_empty()
                    && !subdivision.is_empty()
                    && !raw.contains(['/', '\\']) =>
            {
                Ok(Self::new(region, subdivision))
            }
            _ => Err(InvalidScopeKey(raw.to_string())),
        }
    }
}

impl Display for ScopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.region_code, SCOPE_SEPARATOR, self.subdivision_code
        )
    }
}

/// 整个目录：scope → 显示名
///
/// 键唯一，按键排序迭代，运行期间不会被修改
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<ScopeKey, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一条目录项，返回被覆盖的旧显示名
    pub fn insert(&mut self, scope: ScopeKey, display_name: impl Into<String>) -> Option<String> {
        self.entries.insert(scope, display_name.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn display_name(&self, scope: &ScopeKey) -> Option<&str> {
        self.entries.get(scope).map(String::as_str)
    }

    /// 按迭代顺序返回全部 scope
    pub fn scope_keys(&self) -> Vec<ScopeKey> {
        self.entries.keys().cloned().collect()
    }

    /// 只保留指定地区的条目，`regions` 为空时保留全部
    pub fn retain_regions(&mut self, regions: &[String]) {
        if regions.is_empty() {
            return;
        }
        self.entries
            .retain(|scope, _| regions.iter().any(|r| r == scope.region_code()));
    }

    /// 从 (目录键, 显示名) 序列构造；任一键格式错误则整体失败
    ///
    /// # 参数
    /// - `pairs`: `"REGION-SUBDIVISION"` 键与显示名
    ///
    /// # 返回
    /// 返回目录，或第一个无法解析的键
    pub fn from_pairs<K, V>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, InvalidScopeKey>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut catalog = Catalog::new();
        for (key, name) in pairs {
            let scope: ScopeKey = key.as_ref().parse()?;
            catalog.insert(scope, name);
        }
        Ok(catalog)
    }
}
