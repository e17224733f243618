//! # Error 模块
//!
//! 定义 vn-stage 中使用的错误类型。
//!
//! 稳态 tick（update / render / 输入处理）没有失败路径，
//! 只有初始化阶段会返回错误。

use std::io;

use thiserror::Error;

/// 单个字体来源的加载错误
///
/// 由 [`TypefaceLoader`](crate::TypefaceLoader) 返回；
/// [`load_first_available`](crate::typeface::load_first_available) 记录后继续尝试下一个来源。
#[derive(Error, Debug)]
pub enum TypefaceError {
    /// 字体文件读取失败
    #[error("无法读取字体 {name}: {error}")]
    Io {
        name: String,
        #[source]
        error: io::Error,
    },

    /// 数据不是可解析的字体
    #[error("{name} 不是有效的字体文件")]
    Invalid { name: String },
}

/// 初始化错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InitError {
    /// 没有提供任何候选字体
    #[error("未提供任何候选字体")]
    NoCandidates,

    /// 所有候选字体都加载失败
    #[error("无法加载任何字体（已尝试 {}）", .tried.join(", "))]
    NoTypeface {
        /// 依次尝试过的字体来源
        tried: Vec<String>,
    },
}

/// Result 类型别名
pub type StageResult<T> = Result<T, InitError>;
