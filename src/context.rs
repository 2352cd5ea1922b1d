//! Contexto de ejecución cancelable
//!
//! Cada operación de repositorio recibe un `RequestContext` y lo verifica
//! antes de tomar cualquier lock o de hablar con la base de datos.

use tokio::sync::watch;

use crate::utils::errors::{AppError, AppResult};

/// Señal de cancelación compartida entre el llamador y las operaciones
#[derive(Clone, Debug)]
pub struct RequestContext {
    cancelled: Option<watch::Receiver<bool>>,
}

/// Handle que permite cancelar todos los clones de un contexto
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl RequestContext {
    /// Contexto que nunca se cancela
    pub fn background() -> Self {
        Self { cancelled: None }
    }

    /// Crear un contexto cancelable junto con su handle
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                cancelled: Some(receiver),
            },
            CancelHandle { sender },
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .map_or(false, |receiver| *receiver.borrow())
    }

    /// Falla con `AppError::Cancelled` si el contexto ya fue cancelado
    pub fn check(&self) -> AppResult<()> {
        if self.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        Ok(())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace no falla aunque no queden receptores
        self.sender.send_replace(true);
    }
}
