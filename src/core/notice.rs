/// 每種失敗情況對應一則使用者通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AddFailed,
    RemoveFailed,
    UpdateFailed,
    OutOfStock,
}

impl Notice {
    pub const fn message(self) -> &'static str {
        match self {
            Notice::AddFailed => "Erro na adição do produto",
            Notice::RemoveFailed => "Erro na remoção do produto",
            Notice::UpdateFailed => "Erro na alteração de quantidade do produto",
            Notice::OutOfStock => "Quantidade solicitada fora de estoque",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
