//! 全局错误类型定义
//! 仅覆盖配置/规则加载、外部翻译器与命令行层的失败；
//! 规则编译失败、标签异常等可恢复情况以诊断条目返回，不走错误通道

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum RstError {
    // 规则相关错误
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),
    #[error("规则解析失败：{0}")]
    RuleParseError(String),

    // 编译相关错误
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),
    #[error("不支持的正则标志：{0}")]
    InvalidRegexFlag(char),
    #[error("重复的正则标志：{0}")]
    DuplicateRegexFlag(char),

    // 翻译相关错误
    #[error("翻译失败：{0}")]
    TranslateError(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

// 全局Result类型
pub type RstResult<T> = Result<T, RstError>;
