//! 挿入順を保持する文字列マップとネスト構造の平坦化

use indexmap::IndexMap;
use serde_json::Value;

/// 平坦化したキーの区切り文字
pub const SEPARATOR: &str = "--";

/// 挿入順を保持する `String -> String` マップ
///
/// `Request` からは `&StringMap` としてのみ公開されるため、
/// リクエスト側では読み取り専用ビューとして振る舞う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringMap {
    inner: IndexMap<String, String>,
}

impl StringMap {
    /// 空のマップを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を取得
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    /// 値を取得し、存在しなければデフォルト値を返す
    pub fn try_get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// 挿入順にイテレート
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.inner.values().map(String::as_str)
    }

    /// 値を設定（既存キーは位置を保ったまま上書き）
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    /// 値を削除して返却（残りの順序は保持）
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.inner.shift_remove(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for StringMap {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a StringMap {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// ネストしたオブジェクト/配列を1階層のマップに平坦化する
///
/// `{"list": ["a"], "map": {"foo": "b"}}` は `list--0 => a`, `map--foo => b` になる。
/// トップレベルがコンテナでない場合は空のマップを返す。
pub fn flatten(value: &Value) -> StringMap {
    let mut out = StringMap::new();
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(&mut out, key.clone(), child);
            }
        }
        Value::Array(list) => {
            for (index, child) in list.iter().enumerate() {
                flatten_into(&mut out, index.to_string(), child);
            }
        }
        _ => {}
    }
    out
}

fn flatten_into(out: &mut StringMap, prefix: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(out, format!("{}{}{}", prefix, SEPARATOR, key), child);
            }
        }
        Value::Array(list) => {
            for (index, child) in list.iter().enumerate() {
                flatten_into(out, format!("{}{}{}", prefix, SEPARATOR, index), child);
            }
        }
        scalar => {
            out.set(prefix, scalar_to_string(scalar));
        }
    }
}

/// スカラー値を文字列へ変換（true => "1", false/null => ""）
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        // コンテナは flatten_into 側で処理済み
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested() {
        let value = json!({
            "foo": "bar",
            "list": ["abc", "def", {"foo": "abc"}],
            "map": {
                "bar": "def",
                "list": ["abc"],
                "map": {"foo": "abc"}
            }
        });

        let flat = flatten(&value);
        let pairs: Vec<(&str, &str)> = flat.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("foo", "bar"),
                ("list--0", "abc"),
                ("list--1", "def"),
                ("list--2--foo", "abc"),
                ("map--bar", "def"),
                ("map--list--0", "abc"),
                ("map--map--foo", "abc"),
            ]
        );
    }

    #[test]
    fn test_flatten_scalars() {
        let flat = flatten(&json!({"n": 42, "t": true, "f": false, "z": null, "x": 1.5}));
        assert_eq!(flat.get("n"), Some("42"));
        assert_eq!(flat.get("t"), Some("1"));
        assert_eq!(flat.get("f"), Some(""));
        assert_eq!(flat.get("z"), Some(""));
        assert_eq!(flat.get("x"), Some("1.5"));
    }

    #[test]
    fn test_flatten_non_container() {
        assert!(flatten(&json!("plain")).is_empty());
        assert!(flatten(&Value::Null).is_empty());
        assert_eq!(flatten(&json!(["a", "b"])).get("1"), Some("b"));
    }

    #[test]
    fn test_string_map_set_keeps_position() {
        let mut map: StringMap = [("a", "1"), ("b", "2")].into_iter().collect();
        map.set("a", "3");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some("3"));
        assert_eq!(map.try_get("missing", "dflt"), "dflt");

        assert_eq!(map.remove("a"), Some("3".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key("a"));
    }
}
