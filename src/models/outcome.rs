/// 单个 scope 一次 GET+POST 往返后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 录入成功
    Success,
    /// 远端明确拒绝（校验失败、重复、地区不存在），记入报告
    HandledFailure { message: String },
    /// 响应形状无法识别，保留原始内容供人工排查
    UnexpectedFailure { raw_body: String },
}

impl Outcome {
    pub fn handled(message: impl Into<String>) -> Self {
        Outcome::HandledFailure {
            message: message.into(),
        }
    }

    pub fn unexpected(raw_body: impl Into<String>) -> Self {
        Outcome::UnexpectedFailure {
            raw_body: raw_body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}
