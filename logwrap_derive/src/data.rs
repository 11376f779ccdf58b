#[derive(Debug)]
pub struct Function {
    pub name: String,
    pub receiver: Option<Receiver>,
    pub params: Vec<Param>,
    pub ret: Option<Ty>,
    pub is_async: bool,
    pub public: bool,
    pub docs: Vec<String>,
}

#[derive(Copy, Clone, Debug)]
pub enum Receiver {
    Shared,
    Unique,
    Owned,
}

#[derive(Debug)]
pub struct Param {
    pub name: Option<String>,
    pub ty: Ty,
}

#[derive(Debug)]
pub enum Ty {
    Named(String),
    Unresolved,
}
