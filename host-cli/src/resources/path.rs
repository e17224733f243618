//! # 路径规范化模块
//!
//! 缓存键与资源来源共用的逻辑路径规范化。
//!
//! ## 约定
//!
//! - 逻辑路径相对于 assets_root，使用 `/` 分隔
//! - 不包含 `assets/` 前缀
//! - 同一资源的不同写法规范化后得到同一个缓存键

/// 规范化逻辑路径
///
/// - 统一使用 `/` 分隔符
/// - 跳过 `.` 和空组件
/// - `..` 弹出上一级（不会越过根）
/// - 移除 `assets/` 前缀
pub fn normalize_logical_path(path: &str) -> String {
    let unified = path.replace('\\', "/");

    let mut components = Vec::new();
    for component in unified.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            _ => components.push(component),
        }
    }

    let result = components.join("/");
    match result.strip_prefix("assets/") {
        Some(rest) => rest.to_string(),
        None => result,
    }
}
