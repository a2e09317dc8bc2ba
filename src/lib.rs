//! # 图片缩放工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                前端 / CLI（调用方）                       │
//! │                                                          │
//! │  选择/拖入文件 ── 对比展示 ── 下载 ── 重置                 │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ session ──── 状态机 Idle/Loading/Ready/Failed        │
//! │  │   ├─ outcome       对比视图 + 体积格式化               │
//! │  │   └─ download      固定文件名保存                      │
//! │  │                                                       │
//! │  └─ resizer ──── 100×100 白底等比缩放                     │
//! │      ├─ loader        文件 / Data URL 加载                │
//! │      ├─ handler       编排 + 配置快照                     │
//! │      ├─ geometry      scale / offset / 栅格化             │
//! │      └─ canvas        RasterBackend（解码·合成·编码）      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`resizer`] | 缩放核心：类型校验、解码、等比缩放居中、白底合成、PNG 编码 |
//! | [`session`] | 调用方状态机、后写者胜、结果展示与下载 |

pub mod error;
pub mod resizer;
pub mod session;
