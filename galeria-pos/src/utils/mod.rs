//! 工具模块 - 日志等工具

pub mod logger;
