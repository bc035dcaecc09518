//! Flow-control input on PA4 / EXTI4

use embassy_stm32::gpio::{Input, Pull};
use embassy_stm32::pac;
use embassy_stm32::peripherals::PA4;
use embassy_stm32::Peri;
use syslink_hal::{Edge, EdgeInterruptPin, InputPin};

const LINE: usize = 4;
/// SYSCFG_EXTICR port code of GPIOA
const PORT_A: u8 = 0;

/// Flow-control line driven by the co-processor (high = stop sending)
pub struct FlowControlPin {
    input: Input<'static>,
}

impl FlowControlPin {
    pub fn new(pin: Peri<'static, PA4>) -> Self {
        let input = Input::new(pin, Pull::None);

        pac::RCC.apb2enr().modify(|w| w.set_syscfgen(true));
        pac::SYSCFG
            .exticr(LINE / 4)
            .modify(|w| w.set_exti(LINE % 4, PORT_A));

        Self { input }
    }
}

impl InputPin for FlowControlPin {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}

impl EdgeInterruptPin for FlowControlPin {
    fn enable_edge_interrupt(&mut self, edge: Edge) {
        let rising = matches!(edge, Edge::Rising | Edge::Both);
        let falling = matches!(edge, Edge::Falling | Edge::Both);
        pac::EXTI.rtsr(0).modify(|w| w.set_line(LINE, rising));
        pac::EXTI.ftsr(0).modify(|w| w.set_line(LINE, falling));
        pac::EXTI.imr(0).modify(|w| w.set_line(LINE, true));
    }

    fn disable_edge_interrupt(&mut self) {
        pac::EXTI.imr(0).modify(|w| w.set_line(LINE, false));
    }

    fn clear_pending(&mut self) {
        pac::EXTI.pr(0).write(|w| w.set_line(LINE, true));
    }
}
