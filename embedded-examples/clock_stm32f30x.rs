//! Full example code for a clock face on an ILI9341 panel. This runs on an STM32F303RE, using a
//! 320x240 module connected to SPI1, PA8 for D/C, PA9 for /RESET and PA10 for C/S.
//!
//! There is no time source on the board, so the "clock" counts seconds since boot with the
//! SysTick delay. A real clock would set `seconds` from its time sync instead.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

use cortex_m::asm;
use cortex_m_rt::{entry, exception, ExceptionFrame};
use hal::prelude::*;
use hal::spi;
use panic_abort as _;
use spitft as tft;
use spitft::Rasterizer;
use stm32f30x_hal as hal;

#[exception]
fn HardFault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

const SCALE: u8 = 6;
const DIGITS_Y: i16 = 96;

#[entry]
fn main() -> ! {
    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = hal::stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(64.mhz()).freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    // Get GPIO A where the display is connected.
    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    // Set up SPI1, which is Alternate Function 5 for GPIOs PA5,6,7.
    let sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let config = tft::Config::landscape_320x240();
    let bus = spi::Spi::spi1(
        dp.SPI1,
        (sck, miso, mosi),
        config.spi_mode(),
        config.frequency_hz().hz(),
        clocks,
        &mut rcc.apb2,
    );

    let dc = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let cs = gpioa
        .pa10
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    let mut disp = tft::Display::new(tft::SpiInterface::new(bus, dc, cs, rst), config);

    // On a transport error the display must be brought up from scratch, so the loop below starts
    // over from init.
    let mut seconds: u32 = 0;
    loop {
        let title = tft::PixelCoord(8, 8);
        let advance = tft::text::glyph_advance(2);
        if disp.init(&mut delay).is_err()
            || disp.clear(tft::Rgb565::BLACK).is_err()
            || disp
                .draw_text(title, "CLOCK", tft::Rgb565::CYAN, 2, advance)
                .is_err()
        {
            delay.delay_ms(1000_u16);
            continue;
        }

        let mut shown = [' '; 8];
        loop {
            let text = hhmmss(seconds);
            let mut failed = false;
            for (i, (&c, old)) in text.iter().zip(shown.iter_mut()).enumerate() {
                // Only redraw cells that changed, erasing the previous digit first.
                if c == *old {
                    continue;
                }
                let x = 8 + i as i16 * tft::text::glyph_advance(SCALE);
                let cell = tft::PixelCoord(x, DIGITS_Y);
                if disp
                    .clear_then_draw_char(cell, c, tft::Rgb565::WHITE, tft::Rgb565::BLACK, SCALE)
                    .is_err()
                {
                    failed = true;
                    break;
                }
                *old = c;
            }
            if failed {
                break;
            }
            delay.delay_ms(1000_u16);
            seconds = seconds.wrapping_add(1);
        }
    }
}

fn hhmmss(seconds: u32) -> [char; 8] {
    let digit = |n: u32| char::from(b'0' + (n % 10) as u8);
    let (h, m, s) = ((seconds / 3600) % 24, (seconds / 60) % 60, seconds % 60);
    [
        digit(h / 10),
        digit(h),
        ':',
        digit(m / 10),
        digit(m),
        ':',
        digit(s / 10),
        digit(s),
    ]
}
