/// What the network currently knows about a broadcast transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxReceipt {
    pub block_number: Option<u64>,
    pub confirmations: u64,
    /// Execution was included but reverted
    pub failed: bool,
}

impl TxReceipt {
    pub fn is_confirmed(&self) -> bool {
        !self.failed && self.confirmations > 0
    }
}
